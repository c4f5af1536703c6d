//! # Invoice Canvas CLI
//!
//! Usage:
//!   invoice-canvas new -o invoice.json
//!   invoice-canvas add-cell invoice.json
//!   invoice-canvas insert invoice.json --cell cell-1 --direction right
//!   invoice-canvas drag invoice.json --cell cell-2 --dx 40 --dy 0
//!   invoice-canvas update invoice.json --cell cell-2 --patch '{"fontSize": 18}'
//!   invoice-canvas print invoice.json -o invoice.html
//!   invoice-canvas summary --workspace workspace.json
//!   invoice-canvas example > invoice.json
//!
//! Document commands rewrite the input file unless `-o` is given.
//! Set `RUST_LOG=debug` to see gesture and store logs on stderr.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use invoice_canvas::interaction::{CellPart, InputEvent, PointerButton};
use invoice_canvas::layout::units::{RenderedSurface, ScreenPoint};
use invoice_canvas::layout::Direction;
use invoice_canvas::store::Workspace;
use invoice_canvas::{print, summary, CellPatch, Document, Editor, EditorConfig, Result};

#[derive(Debug, Parser)]
#[command(
    name = "invoice-canvas",
    about = "Edit fixed-page invoice layouts from the command line",
    version
)]
struct Cli {
    /// JSON file with editor thresholds (snap tolerance, minimum size, ...).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write an empty document.
    New {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append a cell at the default stacking position.
    #[command(name = "add-cell")]
    AddCell(DocArgs),

    /// Add a cell next to an existing one.
    Insert {
        #[command(flatten)]
        doc: DocArgs,
        #[arg(long)]
        cell: String,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },

    /// Replay one press / move / release gesture on a cell.
    Drag {
        #[command(flatten)]
        doc: DocArgs,
        #[arg(long)]
        cell: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Move)]
        mode: ModeArg,
        /// Pointer travel in screen pixels.
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        dx: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        dy: f64,
        /// Rendered page size in pixels. Defaults to one pixel per mm.
        #[arg(long, default_value_t = 210.0)]
        width_px: f64,
        #[arg(long, default_value_t = 297.0)]
        height_px: f64,
    },

    /// Apply a JSON property update to a cell.
    Update {
        #[command(flatten)]
        doc: DocArgs,
        #[arg(long)]
        cell: String,
        #[arg(long)]
        patch: String,
    },

    /// Remove a cell.
    Delete {
        #[command(flatten)]
        doc: DocArgs,
        #[arg(long)]
        cell: String,
    },

    /// Print the invoice list of a workspace.
    Summary {
        #[arg(long)]
        workspace: PathBuf,
        /// Emit JSON instead of a tab-separated table.
        #[arg(long)]
        json: bool,
    },

    /// Render a document as printable HTML.
    Print {
        document: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a sample invoice document.
    Example,
}

#[derive(Debug, Args)]
struct DocArgs {
    document: PathBuf,
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Top => Direction::Top,
            DirectionArg::Bottom => Direction::Bottom,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Move,
    Resize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::from_json(&fs::read_to_string(path)?)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::New { output } => {
            let json = serde_json::to_string_pretty(&Document::default())?;
            emit(output.as_deref(), &json)
        }
        Commands::AddCell(doc) => edit(&doc, config, |editor| {
            let id = editor.add_cell().id.clone();
            eprintln!("✓ Added {}", id);
            Ok(())
        }),
        Commands::Insert {
            doc,
            cell,
            direction,
        } => edit(&doc, config, |editor| {
            let id = editor.insert_adjacent(&cell, direction.into())?.id.clone();
            eprintln!("✓ Inserted {}", id);
            Ok(())
        }),
        Commands::Drag {
            doc,
            cell,
            mode,
            dx,
            dy,
            width_px,
            height_px,
        } => edit(&doc, config, |editor| {
            let part = match mode {
                ModeArg::Move => CellPart::Body,
                ModeArg::Resize => CellPart::ResizeHandle,
            };
            editor.handle(&InputEvent::PointerDown {
                cell_id: cell.clone(),
                part,
                button: PointerButton::Primary,
                position: ScreenPoint::new(0.0, 0.0),
            });
            editor.handle(&InputEvent::PointerMove {
                position: ScreenPoint::new(dx, dy),
                surface: RenderedSurface::new(width_px, height_px),
            });
            editor.handle(&InputEvent::PointerUp {
                position: ScreenPoint::new(dx, dy),
            });
            let rect = editor
                .document()
                .cell(&cell)
                .map(|c| c.rect)
                .ok_or_else(|| invoice_canvas::CanvasError::UnknownCell(cell.clone()))?;
            eprintln!(
                "✓ {} at ({}, {}) size {} × {} mm",
                cell, rect.x, rect.y, rect.width, rect.height
            );
            Ok(())
        }),
        Commands::Update { doc, cell, patch } => edit(&doc, config, |editor| {
            let patch = CellPatch::from_json(&patch)?;
            editor.update_cell(&cell, &patch)?;
            Ok(())
        }),
        Commands::Delete { doc, cell } => edit(&doc, config, |editor| {
            editor.delete_cell(&cell)?;
            Ok(())
        }),
        Commands::Summary { workspace, json } => {
            let workspace = Workspace::load(&workspace)?;
            let invoices: Vec<_> = workspace.invoices.list().collect();
            let table = summary::summary_rows(&invoices);
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", table);
            }
            Ok(())
        }
        Commands::Print { document, output } => {
            let document = Document::from_json(&fs::read_to_string(&document)?)?;
            emit(output.as_deref(), &print::render_print_html(&document))
        }
        Commands::Example => {
            print!("{}", EXAMPLE_DOCUMENT);
            Ok(())
        }
    }
}

/// Load a document, run `f` on an editor over it, and write it back.
fn edit<F>(args: &DocArgs, config: EditorConfig, f: F) -> Result<()>
where
    F: FnOnce(&mut Editor) -> Result<()>,
{
    let document = Document::from_json(&fs::read_to_string(&args.document)?)?;
    let mut editor = Editor::with_config(document, config);
    f(&mut editor)?;
    let json = serde_json::to_string_pretty(editor.document())?;
    let target = args.output.as_deref().unwrap_or(&args.document);
    fs::write(target, json)?;
    Ok(())
}

fn emit(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents)?;
            eprintln!("✓ Written {} bytes to {}", contents.len(), path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

const EXAMPLE_DOCUMENT: &str = r##"{
  "cells": [
    {
      "id": "cell-1",
      "type": "text",
      "x": 0, "y": 0, "width": 130, "height": 40,
      "fieldName": "companyName",
      "content": "<b>Acme Supplies Ltd.</b><br>12 Harbour Road",
      "fontSize": 18, "fontWeight": "bold", "color": "#1a1a26",
      "borderTop": true, "borderLeft": true
    },
    {
      "id": "cell-2",
      "type": "image",
      "x": 130, "y": 0, "width": 80, "height": 40,
      "fieldName": "logo",
      "imageUrl": "data:image/png;base64,iVBORw0KGgo=",
      "borderTop": true, "borderLeft": true
    },
    {
      "id": "cell-3",
      "type": "text",
      "x": 0, "y": 40, "width": 105, "height": 30,
      "fieldName": "customerName",
      "content": "Globex Corporation",
      "showInList": true,
      "borderTop": true, "borderLeft": true
    },
    {
      "id": "cell-4",
      "type": "text",
      "x": 105, "y": 40, "width": 105, "height": 30,
      "fieldName": "invoiceDate",
      "content": "2026-01-15",
      "textAlign": "right",
      "showInList": true,
      "borderTop": true, "borderLeft": true, "borderRight": true
    },
    {
      "id": "cell-5",
      "type": "text",
      "x": 0, "y": 70, "width": 210, "height": 227,
      "fieldName": "lineItems",
      "content": "Widgets × 12 ... 240.00<br>Gaskets × 4 ... 18.00",
      "borderTop": true, "borderLeft": true, "borderRight": true, "borderBottom": true
    }
  ],
  "showBorders": true
}
"##;
