use std::path::{Path, PathBuf};

use promoshot::{AssetSet, AssetSpec, Processor, Rng, TextEngine, run_set, system_fallback};

const SHOT_COLOR: [u8; 4] = [250, 20, 200, 255];

fn scratch(name: &str) -> (PathBuf, PathBuf) {
    let root = PathBuf::from("target").join("pipeline").join(name);
    let _ = std::fs::remove_dir_all(&root);
    let input = root.join("in");
    std::fs::create_dir_all(&input).unwrap();
    (input, root.join("out"))
}

fn write_screenshot(dir: &Path, name: &str, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba(SHOT_COLOR))
        .save(dir.join(name))
        .unwrap();
}

#[test]
fn every_output_has_its_store_resolution() {
    let (input, output) = scratch("google_play_resolutions");
    write_screenshot(&input, "timer.png", 60, 130);

    let set = AssetSet::google_play().with_dirs(&input, &output).with_assets(vec![
        AssetSpec::screenshot("timer.png", "Dive into\nDeep Focus", "1_timer.png")
            .with_subtitle("Immersive timer for flow state."),
        AssetSpec::feature_graphic("flow", "feature_graphic.png")
            .with_subtitle("Dive into Deep Focus"),
    ]);

    let reports = run_set(&set, Rng::seeded(1)).unwrap();
    assert_eq!(reports.len(), 2);

    assert_eq!(
        image::image_dimensions(output.join("1_timer.png")).unwrap(),
        (1080, 1920)
    );
    assert_eq!(
        image::image_dimensions(output.join("feature_graphic.png")).unwrap(),
        (1024, 500)
    );
    assert!(reports[0].frame.is_some());
    assert!(reports[1].frame.is_none());
}

#[test]
fn app_store_screenshot_targets_iphone_67() {
    let (input, output) = scratch("app_store_resolution");
    write_screenshot(&input, "screen_flow.png", 40, 86);

    let set = AssetSet::app_store()
        .with_dirs(&input, &output)
        .with_assets(vec![AssetSpec::screenshot(
            "screen_flow.png",
            "Manage Tasks\nEffectively",
            "store_screen_flow.png",
        )]);

    let reports = run_set(&set, Rng::seeded(2)).unwrap();
    assert_eq!((reports[0].width, reports[0].height), (1290, 2796));
    assert_eq!(
        image::image_dimensions(output.join("store_screen_flow.png")).unwrap(),
        (1290, 2796)
    );

    let frame = reports[0].frame.unwrap();
    assert_eq!(frame.outer.width, 1032);
    assert_eq!(frame.screen.width, 1032 - 80);
}

#[test]
fn missing_screenshot_still_writes_a_text_only_image() {
    let (input, output) = scratch("missing_screenshot");
    let set = AssetSet::google_play()
        .with_dirs(&input, &output)
        .with_assets(vec![AssetSpec::screenshot(
            "not_there.png",
            "Instant\nFocus",
            "4_suggest.png",
        )]);

    let reports = run_set(&set, Rng::seeded(3)).unwrap();
    assert!(reports[0].frame.is_none());
    assert_eq!(
        image::image_dimensions(output.join("4_suggest.png")).unwrap(),
        (1080, 1920)
    );
}

#[test]
fn screenshot_is_visible_inside_the_bezel() {
    let (input, output) = scratch("frame_pixels");
    write_screenshot(&input, "heatmap.png", 60, 130);
    let set = AssetSet::google_play().with_dirs(&input, &output);
    let spec = AssetSpec::screenshot("heatmap.png", "Visualize\nYour Effort", "2_heatmap.png");

    let mut processor = Processor::new(&set, Rng::seeded(4)).unwrap();
    let rendered = processor.render(&spec).unwrap();
    let frame = rendered.frame.expect("screenshot exists");
    let canvas = &rendered.canvas;

    assert_eq!(frame.screen.width, 864);
    assert_eq!(frame.screen.height, 864 * 130 / 60);
    assert_eq!(frame.outer.x, (1080 - (864 + 60)) / 2);
    assert_eq!(frame.screen.x, frame.outer.x + 30);
    assert_eq!(frame.screen.y, frame.outer.y + 30);
    assert!(frame.outer.y > rendered.title.bottom());

    let sx = (frame.screen.x + frame.screen.width as i32 / 2) as u32;
    let sy = (frame.screen.y + 100) as u32;
    assert_eq!(canvas.pixel(sx, sy), Some(SHOT_COLOR));

    let bezel_px = canvas
        .pixel(sx, (frame.outer.y + 15) as u32)
        .expect("bezel inside canvas");
    assert_eq!(bezel_px, [30, 30, 30, 255]);
}

#[test]
fn repeated_runs_produce_identical_dimensions() {
    let (input, out_a) = scratch("repeat_a");
    let (_, out_b) = scratch("repeat_b");
    let assets = vec![AssetSpec::feature_graphic("flow", "feature_graphic.png")];

    for out in [&out_a, &out_b] {
        let set = AssetSet::google_play()
            .with_dirs(&input, out)
            .with_assets(assets.clone());
        run_set(&set, Rng::from_entropy()).unwrap();
    }

    assert_eq!(
        image::image_dimensions(out_a.join("feature_graphic.png")).unwrap(),
        image::image_dimensions(out_b.join("feature_graphic.png")).unwrap()
    );
}

#[test]
fn seeded_renders_are_byte_identical() {
    let (input, output) = scratch("seeded");
    let set = AssetSet::google_play().with_dirs(&input, &output);
    let spec = AssetSpec::feature_graphic("flow", "feature_graphic.png");

    let a = Processor::new(&set, Rng::seeded(9))
        .unwrap()
        .render(&spec)
        .unwrap();
    let b = Processor::new(&set, Rng::seeded(9))
        .unwrap()
        .render(&spec)
        .unwrap();
    assert_eq!(a.canvas.data(), b.canvas.data());
}

#[test]
fn output_directory_is_created() {
    let (input, output) = scratch("creates_output_dir");
    let nested = output.join("deeper").join("still");
    assert!(!nested.exists());

    let set = AssetSet::google_play()
        .with_dirs(&input, &nested)
        .with_assets(vec![]);
    run_set(&set, Rng::seeded(0)).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn corrupt_screenshot_is_an_error() {
    let (input, output) = scratch("corrupt_screenshot");
    std::fs::write(input.join("timer.png"), b"definitely not a png").unwrap();
    let set = AssetSet::google_play()
        .with_dirs(&input, &output)
        .with_assets(vec![AssetSpec::screenshot("timer.png", "x", "1_timer.png")]);

    let err = run_set(&set, Rng::seeded(0)).unwrap_err();
    assert!(err.to_string().contains("timer.png"));
}

#[test]
fn title_ink_fills_each_title_line() {
    let Some(font) = system_fallback() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let (input, output) = scratch("title_ink");
    write_screenshot(&input, "timer.png", 60, 130);
    let set = AssetSet::google_play().with_dirs(&input, &output);
    let spec = AssetSpec::screenshot("timer.png", "Dive into\nDeep Focus", "1_timer.png")
        .with_subtitle("Immersive timer for flow state.");

    let text = TextEngine::with_font(font).unwrap();
    let mut processor = Processor::with_text_engine(&set, text, Rng::seeded(5)).unwrap();
    let rendered = processor.render(&spec).unwrap();
    let canvas = &rendered.canvas;
    let white = |x: i32, y: i32| {
        canvas
            .pixel(x as u32, y as u32)
            .is_some_and(|px| px[..3].iter().all(|&c| c > 200))
    };

    assert_eq!(rendered.title.lines.len(), 2);
    for line in &rendered.title.lines {
        let columns: Vec<i32> = (line.x..line.right())
            .filter(|&x| (line.y..line.bottom()).any(|y| white(x, y)))
            .collect();
        assert!(!columns.is_empty(), "no title ink inside {line:?}");
        let span = columns[columns.len() - 1] - columns[0];
        assert!(span as u32 * 10 >= line.width * 7, "ink spans {span}px of {line:?}");
    }

    // Nothing white above the title block.
    let top = rendered.title.lines[0].y;
    for y in 0..top - 2 {
        for x in 0..canvas.width() as i32 {
            assert!(!white(x, y), "stray ink at ({x}, {y})");
        }
    }
}

#[test]
fn very_tall_screenshot_is_framed_not_rejected() {
    let (input, output) = scratch("tall_screenshot");
    write_screenshot(&input, "timer.png", 10, 1000);
    let set = AssetSet::google_play()
        .with_dirs(&input, &output)
        .with_assets(vec![AssetSpec::screenshot("timer.png", "Tall", "1_timer.png")]);

    let reports = run_set(&set, Rng::seeded(6)).unwrap();
    let frame = reports[0].frame.expect("screenshot exists");
    assert_eq!(frame.screen.height, 864 * 100);
    assert_eq!(
        image::image_dimensions(output.join("1_timer.png")).unwrap(),
        (1080, 1920)
    );
}
