// ============================================================================
// Pixelpad CLI — headless drawing via command-line arguments
// ============================================================================
//
// Usage examples:
//   pixelpad --new 64x64 --op "fill:0,0:#ffcc00" -o sun.png
//   pixelpad -i sketch.png --op "line:0,0:63,63:#000000:3" -o out.png
//   pixelpad -i "scans/*.png" --op "fill:0,0:#ffffff" --output-dir cleaned/
//   pixelpad -i doc.ppd --op "erase:10,10/20,20:8" -o doc.ppd
//
// Every op is replayed through the editor as the pointer gesture it stands
// for, on the current thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::components::tools::Editor;
use crate::io::{
    CanvasStore, SaveFormat, download_file_name, encode_and_write, load_image_sync, save_ppd,
};
use crate::ops::command::CanvasOp;
use crate::project::Project;
use crate::settings::AppSettings;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Pixelpad headless canvas editor.
#[derive(Parser, Debug)]
#[command(
    name = "pixelpad",
    about = "Pixelpad headless pixel canvas editor",
    long_about = "Draw on images or blank canvases with brush, eraser, line and\n\
                  flood-fill ops, then export to PNG, JPEG, BMP, TGA or a PPD\n\
                  project file.\n\n\
                  Ops:\n  \
                  fill:X,Y:#rrggbb\n  \
                  line:X0,Y0:X1,Y1:#rrggbb[:WIDTH]\n  \
                  brush:X,Y/X,Y/...:#rrggbb[:WIDTH]\n  \
                  erase:X,Y/X,Y/...[:WIDTH]\n  \
                  clear"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.png", "shots/*.bmp").
    /// Omit to start from a blank canvas.
    #[arg(short, long, num_args = 1..)]
    pub input: Vec<String>,

    /// Size of the blank canvas when no input is given (default from settings).
    #[arg(long, value_name = "WxH", conflicts_with = "input")]
    pub new: Option<String>,

    /// Drawing op, applied in the order given. Repeatable.
    #[arg(long = "op", value_name = "OP")]
    pub ops: Vec<String>,

    /// Output file path. Only valid for a single canvas.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format: png, jpeg, bmp, tga, ppd.
    /// When omitted, the format is inferred from --output's extension, defaulting to png.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// JPEG quality (1–100).
    #[arg(short, long, default_value_t = 90, value_name = "1-100")]
    pub quality: u8,

    /// Restore the stored session canvas onto blank canvases and autosave
    /// after every op.
    #[arg(long)]
    pub session: bool,

    /// Echo the session log to stderr and print per-file timing.
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the CLI and return an OS exit code.
/// `0` = every canvas succeeded, `1` = something failed.
pub fn run(args: CliArgs) -> ExitCode {
    let settings = AppSettings::load();

    let ops = match parse_ops(&args.ops) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let blank_size = match args.new.as_deref() {
        Some(text) => match parse_size(text) {
            Some(size) => size,
            None => {
                eprintln!("error: invalid canvas size '{}', expected WxH (e.g. 640x480).", text);
                return ExitCode::FAILURE;
            }
        },
        None => (settings.canvas_width, settings.canvas_height),
    };

    let inputs = resolve_inputs(&args.input);
    if !args.input.is_empty() && inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let save_format = parse_format(args.format.as_deref(), args.output.as_deref());

    if let Some(dir) = &args.output_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!(
            "error: could not create output directory '{}': {}",
            dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let store = args.session.then(CanvasStore::default_location);
    let job = Job {
        ops: &ops,
        settings: &settings,
        store: store.as_ref(),
        format: save_format,
        quality: args.quality,
    };

    // -- Blank canvas -----------------------------------------------------
    if inputs.is_empty() {
        let output = match (&args.output, &args.output_dir) {
            (Some(out), _) => out.clone(),
            (None, Some(dir)) => dir.join(export_name(&settings, save_format)),
            (None, None) => PathBuf::from(export_name(&settings, save_format)),
        };
        let project = Project::new_untitled(1, blank_size.0, blank_size.1);
        return match job.run(project, true, &output) {
            Ok(()) => {
                if args.verbose {
                    println!("  → {}", output.display());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // -- File inputs --------------------------------------------------------
    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let Some(output_path) = build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
            save_format,
        ) else {
            eprintln!(
                "  error: cannot determine output path for '{}'.",
                input_path.display()
            );
            any_failure = true;
            continue;
        };

        let result = load_image_sync(input_path)
            .map_err(|e| format!("load failed: {}", e))
            .and_then(|canvas| {
                let project = Project::from_file(input_path.clone(), canvas);
                job.run(project, false, &output_path)
            });

        match result {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                crate::log_err!("{}: {}", input_path.display(), e);
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-canvas processing pipeline
// ============================================================================

struct Job<'a> {
    ops: &'a [CanvasOp],
    settings: &'a AppSettings,
    store: Option<&'a CanvasStore>,
    format: SaveFormat,
    quality: u8,
}

impl Job<'_> {
    fn run(&self, project: Project, restore: bool, output: &Path) -> Result<(), String> {
        let mut editor = Editor::new(project, self.settings);

        // -- Step 1: Attach the session store ------------------------------
        if let Some(store) = self.store {
            editor = editor.with_store(store.clone());
            if restore {
                editor
                    .restore()
                    .map_err(|e| format!("restore failed: {}", e))?;
            }
        }

        // -- Step 2: Replay ops ----------------------------------------------
        for (i, op) in self.ops.iter().enumerate() {
            editor
                .apply(op)
                .map_err(|e| format!("op #{} failed: {}", i + 1, e))?;
        }

        // -- Step 3: Save ----------------------------------------------------
        let canvas = &editor.project.canvas;
        match self.format {
            SaveFormat::Ppd => {
                save_ppd(canvas, output).map_err(|e| format!("PPD save failed: {}", e))?;
            }
            format => {
                encode_and_write(&canvas.pixels, output, format, self.quality)
                    .map_err(|e| format!("save failed: {}", e))?;
            }
        }

        editor.project.path = Some(output.to_path_buf());
        editor.project.update_name_from_path();
        editor.project.mark_clean();
        crate::log_info!(
            "saved {} ({}x{}, {} ops)",
            editor.project.display_title(),
            editor.project.canvas.width(),
            editor.project.canvas.height(),
            self.ops.len()
        );
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_ops(raw: &[String]) -> Result<Vec<CanvasOp>, crate::ops::command::OpParseError> {
    raw.iter().map(|s| s.parse::<CanvasOp>()).collect()
}

/// `"640x480"` → `(640, 480)`. Both sides must be between 1 and the canvas limit.
fn parse_size(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.trim().split_once(['x', 'X'])?;
    let w = w.trim().parse::<u32>().ok()?;
    let h = h.trim().parse::<u32>().ok()?;
    let max = crate::canvas::MAX_CANVAS_DIM;
    if w == 0 || h == 0 || w > max || h > max {
        return None;
    }
    Some((w, h))
}

/// Default file name for a blank-canvas export.
fn export_name(settings: &AppSettings, format: SaveFormat) -> String {
    let png = download_file_name(&settings.export_name);
    match format {
        SaveFormat::Png => png,
        other => {
            let stem = png.strip_suffix(".png").unwrap_or(&png);
            format!("{}.{}", stem, other.extension())
        }
    }
}

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Choose the [`SaveFormat`] from the `--format` string or infer it from the
/// output file extension. Defaults to PNG when neither is known.
fn parse_format(format_arg: Option<&str>, output: Option<&Path>) -> SaveFormat {
    if let Some(f) = format_arg {
        return SaveFormat::from_name(f).unwrap_or_else(|| {
            eprintln!("warning: unknown format '{}', writing PNG.", f);
            SaveFormat::Png
        });
    }

    output
        .and_then(SaveFormat::from_path)
        .unwrap_or(SaveFormat::Png)
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, derives filename from input stem)
/// 3. Fallback: same directory as input, same stem, new extension
///    (appends `_out` to stem if it would collide with the input path)
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    format: SaveFormat,
) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let ext = format.extension();
    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("{}.{}", stem, ext)));
    }

    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("{}.{}", stem, ext));

    if candidate == input {
        Some(parent.join(format!("{}_out.{}", stem, ext)))
    } else {
        Some(candidate)
    }
}
