use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kumitate::{FileStore, PuzzleSession, Settings};
use kumitate_core::game::{DIRS, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP};
use kumitate_core::{Board, DropOutcome, EdgeType};
use rand::Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kumitate-cli", version, about = "Cut, solve and inspect jigsaw puzzles")]
struct Cli {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, global = true, env = "KUMITATE_CONFIG", default_value = "kumitate.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut a puzzle and describe its pieces.
    Generate {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Print every piece outline as an SVG path.
        #[arg(long)]
        svg: bool,
    },
    /// Scramble a puzzle and drag every piece home.
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Directory to save the finished game into.
        #[arg(long, env = "KUMITATE_STORE_DIR")]
        save: Option<PathBuf>,
        #[arg(long, default_value = kumitate::LOCAL_GAME_KEY)]
        key: String,
        /// Stop after this many pieces, leaving a partly solved game.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Load a saved game and report its progress.
    Restore {
        #[arg(long, env = "KUMITATE_STORE_DIR")]
        dir: PathBuf,
        #[arg(long, default_value = kumitate::LOCAL_GAME_KEY)]
        key: String,
        #[arg(long, env = "KUMITATE_WIDTH")]
        width: Option<f32>,
        #[arg(long, env = "KUMITATE_HEIGHT")]
        height: Option<f32>,
    },
}

#[derive(Args)]
struct PuzzleArgs {
    #[arg(long, env = "KUMITATE_COLS")]
    cols: Option<u32>,
    #[arg(long, env = "KUMITATE_ROWS")]
    rows: Option<u32>,
    /// Pick the grid closest to this piece count instead of cols x rows.
    #[arg(long, env = "KUMITATE_PIECES")]
    pieces: Option<u32>,
    #[arg(long, env = "KUMITATE_WIDTH")]
    width: Option<f32>,
    #[arg(long, env = "KUMITATE_HEIGHT")]
    height: Option<f32>,
    /// Decimal or 0x-prefixed hex; random when omitted.
    #[arg(long, env = "KUMITATE_SEED")]
    seed: Option<String>,
}

impl PuzzleArgs {
    fn apply(&self, settings: &mut Settings) -> Result<(), Box<dyn std::error::Error>> {
        let puzzle = &mut settings.puzzle;
        if let Some(cols) = self.cols {
            puzzle.cols = cols;
            puzzle.target_pieces = None;
        }
        if let Some(rows) = self.rows {
            puzzle.rows = rows;
            puzzle.target_pieces = None;
        }
        if self.pieces.is_some() {
            puzzle.target_pieces = self.pieces;
        }
        if let Some(width) = self.width {
            puzzle.width = width;
        }
        if let Some(height) = self.height {
            puzzle.height = height;
        }
        if let Some(raw) = self.seed.as_deref() {
            puzzle.seed = Some(parse_seed_arg(raw)?);
        }
        settings.validate()?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Generate { puzzle, svg } => {
            puzzle.apply(&mut settings)?;
            let seed = settings.puzzle.seed.unwrap_or_else(random_seed);
            let board = settings.build_board(seed)?;
            describe(&board);
            if svg {
                for piece in board.pieces() {
                    if let Some(outline) = board.outline(piece.id) {
                        println!("{} {}", piece.id, outline.to_svg_path(piece.solved_position()));
                    }
                }
            }
        }
        Commands::Solve {
            puzzle,
            save,
            key,
            limit,
        } => {
            puzzle.apply(&mut settings)?;
            let seed = settings.puzzle.seed.unwrap_or_else(random_seed);
            let mut session = PuzzleSession::start(&settings, seed)?;
            session.on_complete(|board| {
                println!("completed: {} pieces in one group", board.total());
            });
            let moved = solve(&mut session, limit.unwrap_or(usize::MAX));
            let board = session.board();
            println!(
                "moved {moved} pieces, {} placed, {} groups",
                board.placed_count(),
                board.groups().group_count()
            );
            if let Some(dir) = save {
                let mut store = FileStore::open(&dir)?;
                session.save(&mut store, &key)?;
                println!("saved {key} to {}", dir.display());
            }
        }
        Commands::Restore {
            dir,
            key,
            width,
            height,
        } => {
            let store = FileStore::open(&dir)?;
            let width = width.unwrap_or(settings.puzzle.width);
            let height = height.unwrap_or(settings.puzzle.height);
            let Some(session) = PuzzleSession::resume(&store, &key, width, height)? else {
                println!("no game stored under {key} in {}", dir.display());
                return Ok(());
            };
            let board = session.board();
            describe(board);
            println!(
                "placed: {}/{}, groups: {}, locked groups: {}, complete: {}",
                board.placed_count(),
                board.total(),
                board.groups().group_count(),
                board
                    .groups()
                    .roots()
                    .filter(|root| board.is_locked(*root))
                    .count(),
                board.is_complete()
            );
        }
    }

    Ok(())
}

/// Drags every loose piece onto its solved position, in id order.
fn solve(session: &mut PuzzleSession, limit: usize) -> usize {
    let mut moved = 0;
    for id in 0..session.board().total() {
        if moved >= limit {
            break;
        }
        if session.board().is_locked(id) || !session.begin_drag(id) {
            continue;
        }
        let Some((x, y)) = session.board().piece(id).map(|piece| piece.solved_position()) else {
            session.cancel_drag();
            continue;
        };
        session.drag_to(x, y);
        match session.end_drag() {
            DropOutcome::Snapped { kind, locked, .. } => {
                tracing::info!(piece = id, ?kind, locked, "snapped");
            }
            outcome => {
                tracing::warn!(piece = id, ?outcome, "piece did not snap home");
            }
        }
        moved += 1;
    }
    moved
}

fn describe(board: &Board) {
    let (width, height) = board.grid_size();
    let (piece_width, piece_height) = board.piece_size();
    println!("seed: {:#010x}", board.seed());
    println!(
        "grid: {}x{} ({} pieces) on {width}x{height}, piece {piece_width:.1}x{piece_height:.1}",
        board.cols(),
        board.rows(),
        board.total()
    );
    let mut tabs = 0;
    let mut blanks = 0;
    let mut flats = 0;
    for piece in board.pieces() {
        for dir in DIRS {
            match piece.edge(dir).kind {
                EdgeType::Tab => tabs += 1,
                EdgeType::Blank => blanks += 1,
                EdgeType::Flat => flats += 1,
            }
        }
    }
    println!("edges: {tabs} tabs, {blanks} blanks, {flats} flat");
    let corners = board.pieces().iter().filter(|p| p.is_corner()).count();
    let borders = board.pieces().iter().filter(|p| p.is_border()).count();
    println!("border pieces: {borders} ({corners} corners)");
    if board.total() <= 64 {
        for row in 0..board.rows() as usize {
            let line: Vec<String> = (0..board.cols() as usize)
                .filter_map(|col| board.piece(row * board.cols() as usize + col))
                .map(|piece| {
                    [DIR_UP, DIR_RIGHT, DIR_DOWN, DIR_LEFT]
                        .iter()
                        .map(|dir| edge_glyph(piece.edge(*dir).kind))
                        .collect()
                })
                .collect();
            println!("  {}", line.join(" "));
        }
    }
}

fn edge_glyph(kind: EdgeType) -> char {
    match kind {
        EdgeType::Tab => '+',
        EdgeType::Blank => '-',
        EdgeType::Flat => '.',
    }
}

fn random_seed() -> u32 {
    rand::rng().random()
}

fn parse_seed_arg(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u32>()?
    };
    Ok(value)
}
