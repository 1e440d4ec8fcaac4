//! QuadTexture tests
//!
//! Tests for:
//! - Dimensions read from real image files
//! - Reloading never holding two textures
//! - Missing files leaving a null handle
//! - The four companion parameters

use std::fs;
use std::path::PathBuf;

use brushwork::host::ShaderManager;
use brushwork::host::headless::{HeadlessHost, RecordedParam};
use brushwork::renderer::graph::{QuadTexture, ShaderSource};

// ============================================================================
// Helper
// ============================================================================

/// A scratch directory holding two PNGs of different sizes.
fn texture_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("brushwork-{}-{test}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    image::RgbaImage::new(64, 32).save(dir.join("a.png")).unwrap();
    image::RgbaImage::new(16, 128).save(dir.join("b.png")).unwrap();
    dir
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn dimensions_come_from_the_file() {
    let dir = texture_dir("dimensions");
    let mut host = HeadlessHost::new();

    let texture = QuadTexture::new("gSubstrateTex", &dir, "a.png", &mut host);

    assert!(texture.handle().is_some());
    assert_eq!(texture.dimensions(), [64.0, 32.0]);
    assert_eq!(texture.path(), dir.join("a.png"));
    fs::remove_dir_all(dir).ok();
}

#[test]
fn reload_keeps_one_live_texture() {
    let dir = texture_dir("reload");
    let mut host = HeadlessHost::new();

    let mut texture = QuadTexture::new("gSubstrateTex", &dir, "a.png", &mut host);
    assert!(texture.load_texture("b.png", &mut host));
    assert_eq!(texture.dimensions(), [16.0, 128.0]);
    assert!(texture.load_texture("a.png", &mut host));

    assert_eq!(host.live_textures(), 1);
    assert_eq!(texture.dimensions(), [64.0, 32.0]);
    assert_eq!(texture.file_name(), "a.png");
    assert_eq!(host.texture_path(texture.handle().unwrap()), Some(dir.join("a.png").as_path()));
    fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_file_leaves_null_handle() {
    let dir = texture_dir("missing");
    let mut host = HeadlessHost::new();

    let mut texture = QuadTexture::new("gSubstrateTex", &dir, "a.png", &mut host);
    assert!(!texture.load_texture("does_not_exist.png", &mut host));

    assert!(texture.handle().is_none());
    assert_eq!(texture.dimensions(), [0.0, 0.0]);
    assert_eq!(host.live_textures(), 0);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn release_is_idempotent() {
    let mut host = HeadlessHost::new();
    host.add_virtual_texture("paper.jpg", 2048, 2048);

    let mut texture = QuadTexture::new("gSubstrateTex", "textures", "paper.jpg", &mut host);
    texture.release(&mut host);
    texture.release(&mut host);

    assert!(texture.handle().is_none());
    assert_eq!(host.live_textures(), 0);
}

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn push_sets_four_parameters() {
    let mut host = HeadlessHost::new();
    host.add_virtual_texture("paper.jpg", 2048, 1024);
    let shader = host
        .compile_shader(&ShaderSource::new("quadAdjustLoad", "adjustLoadMNPR"))
        .unwrap();

    let mut texture = QuadTexture::new("gSubstrateTex", "textures", "paper.jpg", &mut host);
    texture.set_scale(0.5);
    texture.set_uv_offset([0.25, -0.75]);

    assert_eq!(texture.push_params(shader, &mut host), 4);
    assert_eq!(
        host.parameter(shader, "gSubstrateTex"),
        Some(&RecordedParam::Texture(texture.handle()))
    );
    assert_eq!(
        host.parameter(shader, "gSubstrateTexUVOffset"),
        Some(&RecordedParam::Float(vec![0.25, -0.75]))
    );
    assert_eq!(
        host.parameter(shader, "gSubstrateTexScale"),
        Some(&RecordedParam::Float(vec![0.5]))
    );
    assert_eq!(
        host.parameter(shader, "gSubstrateTexDimensions"),
        Some(&RecordedParam::Float(vec![2048.0, 1024.0]))
    );
}
