//! Style switching and configuration evaluation tests
//!
//! Tests for:
//! - The two-phase style switch driven by ConfigNode
//! - Deferred evaluation while a rebuild is pending
//! - Render scale, color depth and antialiasing changes
//! - Style parameters written from configured values

use brushwork::host::headless::HeadlessHost;
use brushwork::renderer::graph::{PassState, RenderPass};
use brushwork::renderer::pipeline::ANTIALIASING_PASS;
use brushwork::renderer::settings::DEFAULT_SUBSTRATE_TEXTURE;
use brushwork::styles::oil::{LAB_TARGET, VELOCITY_ATTRIBUTE};
use brushwork::styles::watercolor::{BLEEDING_TARGET, SEPARABLE_H};
use brushwork::{ColorDepth, ConfigNode, ConfigValues, NprOverride, PipelineConfig, StyleId};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn setup() -> (HeadlessHost, NprOverride, ConfigNode) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut host = HeadlessHost::new();
    host.add_virtual_texture(DEFAULT_SUBSTRATE_TEXTURE, 2048, 2048);
    let npr = NprOverride::new(PipelineConfig::default(), &mut host).unwrap();
    (host, npr, ConfigNode::new())
}

/// Evaluates `values` and renders one frame.
fn cycle(npr: &mut NprOverride, node: &ConfigNode, values: &ConfigValues, host: &mut HeadlessHost) {
    node.evaluate(npr, values, host);
    npr.render(host).unwrap();
}

// ============================================================================
// Two-phase style switch
// ============================================================================

#[test]
fn steady_evaluation_marks_initialized() {
    let (mut host, mut npr, node) = setup();
    assert!(!npr.settings().initialized);

    node.evaluate(&mut npr, &ConfigValues::default(), &mut host);

    assert!(npr.settings().initialized);
    assert!(!npr.pending_rebuild());
}

#[test]
fn style_switch_rebuilds_on_next_update() {
    let (mut host, mut npr, node) = setup();
    let mut values = ConfigValues::default();
    cycle(&mut npr, &node, &values, &mut host);

    values.style = StyleId::Oil;
    node.evaluate(&mut npr, &values, &mut host);

    // Recorded, not applied.
    assert!(npr.pending_rebuild());
    assert_eq!(npr.settings().style, StyleId::Oil);
    assert!(!npr.settings().initialized);
    assert!(npr.render_passes().iter().any(|p| p == SEPARABLE_H));

    npr.update(&mut host).unwrap();

    assert!(!npr.pending_rebuild());
    let passes = npr.render_passes();
    assert!(!passes.iter().any(|p| p == SEPARABLE_H));
    assert!(passes.iter().any(|p| p == "[quad] oil compose"));
    let targets = npr.render_targets();
    assert!(targets.iter().any(|t| t == LAB_TARGET));
    assert!(!targets.iter().any(|t| t == BLEEDING_TARGET));
    assert!(npr.schema().get(VELOCITY_ATTRIBUTE).is_some());
    assert!(!npr.settings().initialized);

    node.evaluate(&mut npr, &values, &mut host);
    assert!(npr.settings().initialized);
    assert_eq!(npr.hud_title().as_deref(), Some("Brushwork Oil     (wgpu)"));
}

#[test]
fn style_switch_resets_render_scale() {
    let (mut host, mut npr, node) = setup();
    let mut values = ConfigValues {
        render_scale: 0,
        ..ConfigValues::default()
    };
    cycle(&mut npr, &node, &values, &mut host);
    cycle(&mut npr, &node, &values, &mut host);
    assert!((npr.settings().render_scale.scalar() - 0.5).abs() < EPSILON);

    values.style = StyleId::Charcoal;
    cycle(&mut npr, &node, &values, &mut host);

    assert_eq!(npr.settings().style, StyleId::Charcoal);
    assert!((npr.settings().render_scale.scalar() - 1.0).abs() < EPSILON);
    assert_eq!(npr.targets().descriptor(0).unwrap().width, 1280);
}

#[test]
fn evaluation_waits_for_pending_rebuild() {
    let (mut host, mut npr, node) = setup();
    npr.request_style(StyleId::Sandbox);

    let values = ConfigValues {
        style: StyleId::Sandbox,
        saturation: 0.25,
        ..ConfigValues::default()
    };
    node.evaluate(&mut npr, &values, &mut host);
    assert!((npr.effects().saturation.scalar() - 1.0).abs() < EPSILON);

    npr.update(&mut host).unwrap();
    node.evaluate(&mut npr, &values, &mut host);
    assert!((npr.effects().saturation.scalar() - 0.25).abs() < EPSILON);
}

#[test]
fn every_style_builds_and_renders() {
    let (mut host, mut npr, _) = setup();

    for style in StyleId::ALL {
        npr.request_style(style);
        npr.render(&mut host).unwrap();
        assert_eq!(npr.settings().style, style);
        assert!(npr.is_built(), "{style}");
    }
    npr.teardown(&mut host);
    assert_eq!(host.live_targets(), 0);
    assert_eq!(host.live_shaders(), 0);
}

// ============================================================================
// Engine settings
// ============================================================================

#[test]
fn render_scale_applies_only_once_initialized() {
    let (mut host, mut npr, node) = setup();
    let values = ConfigValues {
        render_scale: 2,
        ..ConfigValues::default()
    };

    cycle(&mut npr, &node, &values, &mut host);
    assert!((npr.settings().render_scale.scalar() - 1.0).abs() < EPSILON);

    cycle(&mut npr, &node, &values, &mut host);
    assert!((npr.settings().render_scale.scalar() - 2.0).abs() < EPSILON);
    assert_eq!(npr.targets().descriptor(0).unwrap().width, 2560);
}

#[test]
fn color_depth_from_configuration() {
    let (mut host, mut npr, node) = setup();
    let values = ConfigValues {
        color_depth: 0,
        ..ConfigValues::default()
    };

    cycle(&mut npr, &node, &values, &mut host);

    assert_eq!(npr.settings().color_depth, ColorDepth::Bits8);
    let color = npr.targets().target_by_name("colorTarget").unwrap();
    assert_eq!(host.target_desc(color).unwrap().format, wgpu::TextureFormat::Rgba8Snorm);
}

#[test]
fn antialiasing_change_recompiles_its_pass() {
    let (mut host, mut npr, node) = setup();
    let mut values = ConfigValues::default();
    cycle(&mut npr, &node, &values, &mut host);
    let compiles = host.compiles;

    values.antialiasing = 2;
    node.evaluate(&mut npr, &values, &mut host);
    assert_eq!(npr.pass(ANTIALIASING_PASS).unwrap().state(), PassState::ShaderReset);

    npr.render(&mut host).unwrap();
    assert_eq!(host.compiles, compiles + 1);
    assert!((npr.settings().antialiasing.scalar() - 2.0).abs() < EPSILON);
}

#[test]
fn substrate_values_are_clamped() {
    let (mut host, mut npr, node) = setup();
    let values = ConfigValues {
        substrate_shading: 3.0,
        substrate_light_dir: 400.0,
        substrate_light_tilt: -10.0,
        substrate_scale: 10.0,
        substrate_update: 4.0,
        ..ConfigValues::default()
    };

    node.evaluate(&mut npr, &values, &mut host);

    let settings = npr.settings();
    assert!((settings.substrate_shading.scalar() - 1.0).abs() < EPSILON);
    assert!((settings.substrate_light_dir.scalar() - 359.0).abs() < EPSILON);
    assert!(settings.substrate_light_tilt.scalar().abs() < EPSILON);
    assert!((settings.substrate_scale.scalar() - 1.0 / 2.5).abs() < EPSILON);
    assert!((settings.substrate_update.scalar() - 250.0).abs() < EPSILON);
}

// ============================================================================
// Style parameters
// ============================================================================

#[test]
fn watercolor_parameters_follow_values() {
    let (mut host, mut npr, node) = setup();
    let values = ConfigValues::default()
        .with_style_value("bleedingRadius", 5.0)
        .with_style_value("drybrushThreshold", 5.0)
        .with_style_value("edgeDarkeningIntensity", 100.0);

    node.evaluate(&mut npr, &values, &mut host);

    let fx = npr.effects();
    assert!((fx.bleeding_radius.scalar() - 5.0).abs() < EPSILON);
    assert_eq!(fx.bleeding_weights.get().len(), 11);
    assert!((fx.dry_brush_threshold.scalar() - 15.0).abs() < EPSILON);
    // Clamped to the declared maximum.
    assert!((fx.edge_darkening_intensity.scalar() - 25.0).abs() < EPSILON);
}

#[test]
fn oil_velocity_attribute_toggles_velocity() {
    let mut host = HeadlessHost::new();
    let config = PipelineConfig {
        initial_style: StyleId::Oil,
        ..PipelineConfig::default()
    };
    let mut npr = NprOverride::new(config, &mut host).unwrap();
    let node = ConfigNode::new();
    assert!(npr.settings().velocity_enabled());

    let values = ConfigValues {
        style: StyleId::Oil,
        ..ConfigValues::default()
    }
    .with_style_value(VELOCITY_ATTRIBUTE, 0.0);
    node.evaluate(&mut npr, &values, &mut host);

    assert!(!npr.settings().velocity_enabled());
}
