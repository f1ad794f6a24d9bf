use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flagpix::error::{ConvertError, PersistError};
use flagpix::image_io;
use flagpix::store::{SlotStore, DEFAULT_COMPANY, DEFAULT_PRODUCT, FLAG_GRID_SLOT};
use palette_map::{
    flag_palette, CanonicalGrid, GridConverter, Palette, DEFAULT_GRID_HEIGHT,
    DEFAULT_GRID_WIDTH, WIRE_FORMAT_VERSION,
};

#[derive(Parser)]
#[command(name = "flagpix")]
#[command(about = "Convert images into fixed-palette pixel grid token streams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image to a serialized flag grid
    Convert {
        /// Input PNG file path
        input: PathBuf,

        /// Output file for the serialized grid data
        #[arg(short, long, default_value = "pixel_grid_data.txt")]
        output: PathBuf,

        /// Skip writing the output file
        #[arg(long)]
        no_file: bool,

        /// Skip writing to the slot store
        #[arg(long)]
        no_store: bool,

        /// Skip writing the preview PNGs (resized grid + palette atlas)
        #[arg(long)]
        no_preview: bool,

        /// Grid width in cells
        #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
        grid_width: usize,

        /// Grid height in cells
        #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT)]
        grid_height: usize,

        /// Keep original colors in the preview instead of quantizing
        #[arg(long)]
        preserve_colors: bool,

        /// Build the palette from the image's own colors (legacy mode)
        /// instead of the fixed wire-format table
        #[arg(long)]
        dynamic_palette: bool,

        /// Company segment of the slot store path
        #[arg(long, default_value = DEFAULT_COMPANY)]
        company: String,

        /// Product segment of the slot store path
        #[arg(long, default_value = DEFAULT_PRODUCT)]
        product: String,
    },
    /// List candidate slot store locations
    FindStore,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flagpix=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            no_file,
            no_store,
            no_preview,
            grid_width,
            grid_height,
            preserve_colors,
            dynamic_palette,
            company,
            product,
        } => run_convert(ConvertOptions {
            input,
            output,
            no_file,
            no_store,
            no_preview,
            grid_width,
            grid_height,
            preserve_colors,
            dynamic_palette,
            company,
            product,
        }),
        Commands::FindStore => run_find_store(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(%e, "conversion failed");
            ExitCode::FAILURE
        }
    }
}

struct ConvertOptions {
    input: PathBuf,
    output: PathBuf,
    no_file: bool,
    no_store: bool,
    no_preview: bool,
    grid_width: usize,
    grid_height: usize,
    preserve_colors: bool,
    dynamic_palette: bool,
    company: String,
    product: String,
}

/// Run one conversion: load, resample, match, serialize, persist.
///
/// Persistence failures are recoverable: they are logged and reported but
/// the computed token stream is still printed and the exit code stays zero.
fn run_convert(opts: ConvertOptions) -> anyhow::Result<()> {
    tracing::info!(input = %opts.input.display(), "loading image");
    let (pixels, src_width, src_height) = image_io::load_rgba(&opts.input)?;

    tracing::info!(
        from = %format!("{src_width}x{src_height}"),
        to = %format!("{}x{}", opts.grid_width, opts.grid_height),
        "resizing image to grid"
    );
    let grid = CanonicalGrid::resample(
        &pixels,
        src_width,
        src_height,
        opts.grid_width,
        opts.grid_height,
    )
    .map_err(ConvertError::Grid)?;

    let palette = if opts.dynamic_palette {
        // Legacy path: palette from the resampled image's own colors
        let palette = Palette::from_image_colors(grid.pixels()).map_err(ConvertError::Palette)?;
        tracing::info!(colors = palette.len(), "built dynamic palette from image");
        palette
    } else {
        let palette = flag_palette().map_err(ConvertError::Palette)?;
        tracing::info!(
            colors = palette.len(),
            version = WIRE_FORMAT_VERSION,
            "using fixed wire-format palette"
        );
        palette
    };

    let converter = GridConverter::new(palette)
        .grid_size(opts.grid_width, opts.grid_height)
        .recolor(!opts.preserve_colors);

    tracing::info!("matching cells to palette tokens");
    let result = converter
        .convert_resampled(grid.pixels().to_vec())
        .map_err(ConvertError::Grid)?;

    tracing::info!("serializing grid data");
    let grid_data = result.data.serialize();

    // Everything after this point is persistence: recoverable by contract.
    let mut persist_failures = Vec::new();

    if !opts.no_preview {
        if let Err(e) = write_previews(&result.grid, converter.palette()) {
            persist_failures.push(e);
        }
    }

    if !opts.no_file {
        match std::fs::write(&opts.output, &grid_data) {
            Ok(()) => {
                tracing::info!(path = %opts.output.display(), "grid data saved to file");
            }
            Err(source) => persist_failures.push(PersistError::Write {
                artifact: opts.output.display().to_string(),
                source,
            }),
        }
    }

    if !opts.no_store {
        let store = SlotStore::from_env(&opts.company, &opts.product);
        match store.save_slot(FLAG_GRID_SLOT, &grid_data) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "grid data saved to slot store");
            }
            Err(e) => persist_failures.push(e),
        }
    }

    for failure in &persist_failures {
        tracing::error!(%failure, "persistence failed (result still computed)");
    }
    if !persist_failures.is_empty() {
        eprintln!("Warning: some outputs could not be saved; run 'flagpix find-store' to check store locations");
    }

    tracing::info!(
        tokens = result.data.tokens().len(),
        "conversion completed"
    );

    // Preview of the serialized stream, like the renderer tooling expects
    if grid_data.len() > 200 {
        println!("{}...", &grid_data[..200]);
    } else {
        println!("{grid_data}");
    }

    Ok(())
}

fn write_previews(grid: &CanonicalGrid, palette: &Palette) -> Result<(), PersistError> {
    image_io::write_rgba_png(
        std::path::Path::new("resized_image.png"),
        grid.pixels(),
        grid.width(),
        grid.height(),
    )?;
    tracing::info!("resized image saved as 'resized_image.png'");

    let (atlas, atlas_w, atlas_h) = image_io::palette_atlas(palette);
    image_io::write_rgba_png(
        std::path::Path::new("color_palette.png"),
        &atlas,
        atlas_w,
        atlas_h,
    )?;
    tracing::info!("palette atlas saved as 'color_palette.png'");
    Ok(())
}

/// Discovery mode: list candidate `<company>/<product>` store locations.
fn run_find_store() -> anyhow::Result<()> {
    let store = SlotStore::from_env(DEFAULT_COMPANY, DEFAULT_PRODUCT);
    println!("Store root: {}", store.root().display());

    match store.discover() {
        Ok(locations) if locations.is_empty() => {
            println!("No store locations found.");
        }
        Ok(locations) => {
            println!("Found store locations:");
            for (company, product) in locations {
                println!("  - {company}/{product}");
            }
        }
        Err(e) => {
            println!("Store root not readable: {e}");
        }
    }
    Ok(())
}
