use clap::{Args, Parser, Subcommand};
use image::RgbImage;
use quadspace::tools::{
    OverlayStyle, ToolResult, draw_overlay, estimator_options, load_quad, load_rgb, parse_point,
    rect_height_from_env, rect_width_from_env,
};
use quadspace::{Corner, Edge, HomographyEstimator, Point, QuadEdit, RectSpace};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "quadtool", version, about = "Homography and rect-space tools for image quads")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct SpaceArgs {
    /// Image quad: "x,y;x,y;x,y;x,y" or a JSON file holding four points
    #[arg(long, allow_hyphen_values = true)]
    quad: String,
    /// Rect width (default: QUAD_RECT_W or 1)
    #[arg(long)]
    width: Option<f64>,
    /// Rect height (default: QUAD_RECT_H or 1)
    #[arg(long)]
    height: Option<f64>,
    /// Reject quads with a corner sine below this (default: QUAD_MIN_CORNER_SINE)
    #[arg(long)]
    min_corner_sine: Option<f64>,
}

impl SpaceArgs {
    fn build(&self) -> ToolResult<RectSpace> {
        let quad = load_quad(&self.quad)?;
        let space = RectSpace::with_options(
            quad,
            self.width.unwrap_or_else(rect_width_from_env),
            self.height.unwrap_or_else(rect_height_from_env),
            estimator_options(self.min_corner_sine),
        )?;
        Ok(space)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the homography carrying --src onto --dst
    Homography {
        /// Four source points "x,y;x,y;x,y;x,y" (or JSON file)
        #[arg(long, allow_hyphen_values = true)]
        src: String,
        /// Four destination points in the same order
        #[arg(long, allow_hyphen_values = true)]
        dst: String,
        /// Reject quads with a corner sine below this
        #[arg(long)]
        min_corner_sine: Option<f64>,
    },
    /// Map an image point into rect space
    ToRect {
        #[command(flatten)]
        space: SpaceArgs,
        /// Image point "x,y"
        #[arg(long, allow_hyphen_values = true)]
        point: String,
    },
    /// Map a rect point into image space
    ToImage {
        #[command(flatten)]
        space: SpaceArgs,
        /// Rect point "u,v"
        #[arg(long, allow_hyphen_values = true)]
        point: String,
    },
    /// Apply a rect-space edit and print the new quad
    Edit {
        #[command(flatten)]
        space: SpaceArgs,
        #[command(subcommand)]
        edit: EditCommand,
    },
    /// Print the image-space vertices of a rect-space lattice
    Mesh {
        #[command(flatten)]
        space: SpaceArgs,
        #[arg(long, default_value = "10")]
        cols: usize,
        #[arg(long, default_value = "10")]
        rows: usize,
    },
    /// Draw the quad, its handles and rect-space grid into a PNG
    Overlay {
        #[command(flatten)]
        space: SpaceArgs,
        /// Background image (a black 800x600 canvas when omitted)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output path
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "10")]
        cols: usize,
        #[arg(long, default_value = "10")]
        rows: usize,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum EditCommand {
    /// Move the whole quad
    Pan {
        #[arg(long, allow_hyphen_values = true)]
        du: f64,
        #[arg(long, allow_hyphen_values = true)]
        dv: f64,
    },
    /// Grow or shrink about corner 0
    Scale {
        #[arg(long, allow_hyphen_values = true)]
        d: f64,
    },
    /// Drag edge 0..3 (top, right, bottom, left)
    Edge {
        #[arg(long)]
        index: usize,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        du: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dv: f64,
    },
    /// Drag corner 0..3 (top-left, top-right, bottom-right, bottom-left)
    Corner {
        #[arg(long)]
        index: usize,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        du: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dv: f64,
    },
}

impl EditCommand {
    fn to_edit(self) -> ToolResult<QuadEdit> {
        Ok(match self {
            EditCommand::Pan { du, dv } => QuadEdit::Pan { du, dv },
            EditCommand::Scale { d } => QuadEdit::Scale { d },
            EditCommand::Edge { index, du, dv } => QuadEdit::Edge {
                edge: Edge::from_index(index)
                    .ok_or_else(|| format!("edge index {} not in 0..4", index))?,
                du,
                dv,
            },
            EditCommand::Corner { index, du, dv } => QuadEdit::Corner {
                corner: Corner::from_index(index)
                    .ok_or_else(|| format!("corner index {} not in 0..4", index))?,
                du,
                dv,
            },
        })
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Homography {
            src,
            dst,
            min_corner_sine,
        } => homography_cmd(&src, &dst, min_corner_sine),
        Command::ToRect { space, point } => map_cmd(&space, &point, true),
        Command::ToImage { space, point } => map_cmd(&space, &point, false),
        Command::Edit { space, edit } => edit_cmd(&space, edit),
        Command::Mesh { space, cols, rows } => mesh_cmd(&space, cols, rows),
        Command::Overlay {
            space,
            image,
            out,
            cols,
            rows,
        } => overlay_cmd(&space, image, &out, cols, rows),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> ToolResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn homography_cmd(src: &str, dst: &str, min_corner_sine: Option<f64>) -> ToolResult<()> {
    let src = load_quad(src)?;
    let dst = load_quad(dst)?;
    let start = Instant::now();
    let h = HomographyEstimator::new()
        .with_options(estimator_options(min_corner_sine))
        .estimate(&src, &dst)?;
    log::info!("estimated in {:.3} us", start.elapsed().as_secs_f64() * 1e6);
    print_json(&h)
}

fn map_cmd(args: &SpaceArgs, point: &str, to_rect: bool) -> ToolResult<()> {
    let space = args.build()?;
    let p = parse_point(point)?;
    let mapped: Point = if to_rect {
        space.to_rect(p)?
    } else {
        space.to_image(p)?
    };
    print_json(&mapped)
}

fn edit_cmd(args: &SpaceArgs, edit: EditCommand) -> ToolResult<()> {
    let space = args.build()?;
    let next = space.apply(&edit.to_edit()?)?;
    print_json(next.quad())
}

fn mesh_cmd(args: &SpaceArgs, cols: usize, rows: usize) -> ToolResult<()> {
    let space = args.build()?;
    let mesh = space.mesh(cols, rows)?;
    print_json(&mesh)
}

fn overlay_cmd(
    args: &SpaceArgs,
    image: Option<PathBuf>,
    out: &Path,
    cols: usize,
    rows: usize,
) -> ToolResult<()> {
    let space = args.build()?;
    let mut img = match image {
        Some(path) => {
            log::info!("Loading image: {}", path.display());
            load_rgb(&path)?
        }
        None => RgbImage::new(800, 600),
    };
    draw_overlay(&mut img, &space, cols, rows, &OverlayStyle::default())?;
    img.save(out)?;
    log::info!("Overlay written to {}", out.display());
    Ok(())
}
