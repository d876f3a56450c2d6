//! End-to-end checks for writing dendrogram PNGs to disk.

use std::fs;

use linkplot_core::{ColorThreshold, DendrogramLayout, LinkageMatrix};
use linkplot_render::{DendrogramPlotter, FontSource, PlotterBuilder, RenderError, link_rgb};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn layout() -> DendrogramLayout {
    let matrix: LinkageMatrix = "0 1 1.0 2\n2 3 2.0 3\n"
        .parse()
        .expect("scenario linkage must parse");
    DendrogramLayout::build(&matrix, ColorThreshold::Default)
}

#[fixture]
fn plotter() -> DendrogramPlotter {
    PlotterBuilder::new()
        .with_size(400, 250)
        .with_font(FontSource::Disabled)
        .build()
        .expect("plotter must build")
}

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().expect("temp dir must be created")
}

#[rstest]
fn saved_png_decodes_to_rendered_pixels(
    layout: DendrogramLayout,
    plotter: DendrogramPlotter,
    workspace: TempDir,
) {
    let path = workspace.path().join("dendrogram.png");
    plotter.save(&layout, &path).expect("save must succeed");

    let decoded = image::open(&path).expect("png must decode").to_rgb8();
    assert_eq!(decoded.dimensions(), (400, 250));

    let rendered = plotter.render(&layout).expect("render must succeed");
    assert_eq!(decoded.as_raw().as_slice(), rendered.pixels());
}

#[rstest]
fn repeated_saves_produce_identical_files(
    layout: DendrogramLayout,
    plotter: DendrogramPlotter,
    workspace: TempDir,
) {
    let first = workspace.path().join("first.png");
    let second = workspace.path().join("second.png");
    plotter.save(&layout, &first).expect("first save must succeed");
    plotter.save(&layout, &second).expect("second save must succeed");
    assert_eq!(
        fs::read(&first).expect("first png must be readable"),
        fs::read(&second).expect("second png must be readable"),
    );
}

#[rstest]
fn save_overwrites_existing_file(
    layout: DendrogramLayout,
    plotter: DendrogramPlotter,
    workspace: TempDir,
) {
    let path = workspace.path().join("dendrogram.png");
    fs::write(&path, b"stale").expect("stale file must be written");
    plotter.save(&layout, &path).expect("save must succeed");
    let bytes = fs::read(&path).expect("png must be readable");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[rstest]
fn save_leaves_missing_directory_untouched(
    layout: DendrogramLayout,
    plotter: DendrogramPlotter,
    workspace: TempDir,
) {
    let path = workspace.path().join("data").join("dendrogram.png");
    let err = plotter
        .save(&layout, &path)
        .expect_err("missing directory must fail");
    assert!(matches!(err, RenderError::MissingOutputDirectory { .. }));
    assert_eq!(err.code().as_str(), "RENDER_MISSING_OUTPUT_DIRECTORY");
    assert!(!workspace.path().join("data").exists());
}

#[rstest]
fn disabled_colouring_draws_every_link_in_one_colour(plotter: DendrogramPlotter) {
    let matrix: LinkageMatrix = "0 1 1.0 2\n2 3 2.0 3\n"
        .parse()
        .expect("scenario linkage must parse");
    let layout = DendrogramLayout::build(&matrix, ColorThreshold::Disabled);
    let image = plotter.render(&layout).expect("render must succeed");
    let colours: Vec<[u8; 3]> = layout
        .brackets()
        .iter()
        .map(|bracket| {
            let rgb = link_rgb(bracket.color());
            [rgb.0, rgb.1, rgb.2]
        })
        .collect();
    assert!(colours.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(
        image
            .pixels()
            .chunks_exact(3)
            .any(|pixel| pixel == colours[0])
    );
}
