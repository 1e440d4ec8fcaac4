//! NprOverride tests
//!
//! Tests for:
//! - Target and pass registration order of a built graph
//! - Resize, render scale and MSAA reconciliation
//! - Color depth changes reaching the host in one batch
//! - Substrate UV animation on the timeline clock
//! - Frame setup failures, teardown and shader degradation
//! - A complete frame's draw sequence and HUD statistics

use brushwork::host::headless::{DrawCall, HeadlessHost};
use brushwork::renderer::graph::passes::hud::HUD_PASS_NAME;
use brushwork::renderer::graph::passes::present::PRESENT_PASS_NAME;
use brushwork::renderer::graph::{PassState, RenderPass};
use brushwork::renderer::pipeline::{
    ADJUST_LOAD_PASS, ANTIALIASING_PASS, DEBUGGER_PASS, EDGE_DETECTION_PASS, GEOMETRY_PASS, OUTPUT_TARGET,
    PRESENT_TARGET, STYLIZATION_TARGET, SUBSTRATE_LIGHTING_PASS, SUBSTRATE_TEXTURE_PARAM, UI_PASS, substrate_uv_offset,
};
use brushwork::renderer::settings::DEFAULT_SUBSTRATE_TEXTURE;
use brushwork::styles::watercolor::{BLEEDING_TARGET, SEPARABLE_H};
use brushwork::{BrushworkError, ColorDepth, NprOverride, PipelineConfig};

// ============================================================================
// Helper
// ============================================================================

/// Quad passes of the watercolor graph: 5 fixed plus 8 from the style.
const WATERCOLOR_QUADS: usize = 13;

fn host() -> HeadlessHost {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut host = HeadlessHost::new();
    host.add_virtual_texture(DEFAULT_SUBSTRATE_TEXTURE, 2048, 2048);
    host
}

fn watercolor(host: &mut HeadlessHost) -> NprOverride {
    NprOverride::new(PipelineConfig::default(), host).unwrap()
}

fn size_of(npr: &NprOverride, host: &HeadlessHost, name: &str) -> (u32, u32) {
    let handle = npr.targets().target_by_name(name).unwrap();
    let desc = host.target_desc(handle).unwrap();
    (desc.width, desc.height)
}

fn set_timeline(host: &mut HeadlessHost, ms: f64) {
    host.frame_mut().unwrap().timeline_ms = ms;
}

fn uv_offset(npr: &NprOverride) -> [f32; 2] {
    npr.quad_pass(ADJUST_LOAD_PASS)
        .unwrap()
        .params()
        .texture(SUBSTRATE_TEXTURE_PARAM)
        .unwrap()
        .uv_offset()
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn build_registers_targets_in_order() {
    let mut host = host();
    let npr = watercolor(&mut host);
    let targets = npr.render_targets();

    assert_eq!(targets.len(), 16);
    assert_eq!(targets[0], "colorTarget");
    assert_eq!(targets[1], "depthTarget");
    assert_eq!(targets[11], "velocity");
    assert_eq!(targets[12], BLEEDING_TARGET);
    assert_eq!(&targets[13..], [STYLIZATION_TARGET, OUTPUT_TARGET, PRESENT_TARGET]);
    assert_eq!(npr.targets().present_index(), Some(15));
    assert_eq!(host.live_targets(), 16);
}

#[test]
fn build_registers_passes_in_order() {
    let mut host = host();
    let npr = watercolor(&mut host);
    let passes = npr.render_passes();

    assert_eq!(passes.len(), 16);
    assert_eq!(&passes[..4], [GEOMETRY_PASS, ADJUST_LOAD_PASS, EDGE_DETECTION_PASS, "[quad] pigment density"]);
    assert_eq!(
        &passes[11..],
        [ANTIALIASING_PASS, SUBSTRATE_LIGHTING_PASS, DEBUGGER_PASS, UI_PASS, HUD_PASS_NAME, PRESENT_PASS_NAME]
    );
    assert_eq!(npr.pass_index(SEPARABLE_H).unwrap(), 4);
    assert!(npr.is_built());
}

#[test]
fn hud_title_names_style_and_api() {
    let mut host = host();
    let npr = watercolor(&mut host);

    assert_eq!(npr.hud_title().as_deref(), Some("Brushwork Watercolor     (wgpu)"));
}

#[test]
fn build_twice_is_rejected() {
    let mut host = host();
    let mut npr = watercolor(&mut host);

    let err = npr.build(&mut host).unwrap_err();
    assert!(matches!(err, BrushworkError::ConfigurationMismatch(_)));
    assert_eq!(host.live_targets(), 16);
}

// ============================================================================
// Resize & MSAA
// ============================================================================

#[test]
fn first_update_sizes_to_viewport() {
    let mut host = host();
    let mut npr = watercolor(&mut host);

    npr.update(&mut host).unwrap();

    for name in npr.render_targets() {
        assert_eq!(size_of(&npr, &host, &name), (1280, 720), "{name}");
    }
    assert_eq!(host.target_batches.len(), 1);
}

#[test]
fn render_scale_keeps_output_at_viewport_size() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();

    npr.settings().render_scale.set_scalar(0.5);
    npr.refresh_targets();
    npr.update(&mut host).unwrap();

    assert_eq!(size_of(&npr, &host, "colorTarget"), (640, 360));
    assert_eq!(size_of(&npr, &host, BLEEDING_TARGET), (640, 360));
    assert_eq!(size_of(&npr, &host, STYLIZATION_TARGET), (640, 360));
    assert_eq!(size_of(&npr, &host, OUTPUT_TARGET), (1280, 720));
    assert_eq!(size_of(&npr, &host, PRESENT_TARGET), (1280, 720));
}

#[test]
fn steady_frames_do_not_touch_targets() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();
    host.clear_log();

    npr.update(&mut host).unwrap();
    npr.update(&mut host).unwrap();

    assert!(host.target_batches.is_empty());
}

#[test]
fn viewport_resize_updates_every_target() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();

    host.set_viewport(801, 601);
    npr.update(&mut host).unwrap();

    assert_eq!(size_of(&npr, &host, "edgeTarget"), (801, 601));
    assert_eq!(size_of(&npr, &host, PRESENT_TARGET), (801, 601));
    assert_eq!(host.target_batches.len(), 2);
}

#[test]
fn host_sample_count_applies_to_all_targets() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    host.frame_mut().unwrap().sample_count = 4;

    npr.update(&mut host).unwrap();

    assert!(npr.targets().descriptors().iter().all(|d| d.sample_count == 4));
}

#[test]
fn change_msaa_is_one_immediate_batch() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();
    host.clear_log();

    npr.change_msaa(8, &mut host);

    assert_eq!(host.target_batches.len(), 1);
    assert_eq!(host.target_batches[0].len(), 16);
    assert!(host.target_batches[0].iter().all(|(_, desc)| desc.sample_count == 8));
}

// ============================================================================
// Color depth
// ============================================================================

#[test]
fn color_depth_changes_five_formats_in_one_batch() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();
    let before: Vec<_> = npr.targets().descriptors().iter().map(|d| d.format).collect();
    host.clear_log();

    npr.change_color_depth(ColorDepth::Bits32);
    npr.update(&mut host).unwrap();

    let after: Vec<_> = npr.targets().descriptors().iter().map(|d| d.format).collect();
    let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
    assert_eq!(changed, 5);
    assert_eq!(host.target_batches.len(), 1);

    let present = npr.targets().target_by_name(PRESENT_TARGET).unwrap();
    assert_eq!(host.target_desc(present).unwrap().format, wgpu::TextureFormat::Rgba32Float);
    assert_eq!(npr.settings().color_depth, ColorDepth::Bits32);
}

// ============================================================================
// Substrate animation
// ============================================================================

#[test]
fn substrate_offset_changes_once_per_interval() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.settings().substrate_update.set_scalar(250.0);

    for ms in [0.0, 100.0, 250.0] {
        set_timeline(&mut host, ms);
        npr.render(&mut host).unwrap();
        assert_eq!(uv_offset(&npr), [0.0, 0.0], "at {ms} ms");
    }

    set_timeline(&mut host, 300.0);
    npr.render(&mut host).unwrap();
    assert_eq!(uv_offset(&npr), substrate_uv_offset(300.0));

    set_timeline(&mut host, 400.0);
    npr.render(&mut host).unwrap();
    assert_eq!(uv_offset(&npr), substrate_uv_offset(300.0));

    set_timeline(&mut host, 600.0);
    npr.render(&mut host).unwrap();
    assert_eq!(uv_offset(&npr), substrate_uv_offset(600.0));
    assert_eq!(npr.settings().substrate_uv_offset.get(), substrate_uv_offset(600.0).to_vec());
}

#[test]
fn substrate_animation_disabled_at_zero_interval() {
    let mut host = host();
    let mut npr = watercolor(&mut host);

    set_timeline(&mut host, 10_000.0);
    npr.update(&mut host).unwrap();

    assert_eq!(uv_offset(&npr), [0.0, 0.0]);
}

// ============================================================================
// Frame setup & degradation
// ============================================================================

#[test]
fn missing_frame_context_fails_the_frame() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    host.set_frame(None);

    let err = npr.render(&mut host).unwrap_err();

    assert!(matches!(err, BrushworkError::FrameSetup(_)));
    assert!(host.draws.is_empty());
}

#[test]
fn zero_viewport_fails_the_frame() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    host.set_viewport(0, 720);

    assert!(matches!(npr.update(&mut host), Err(BrushworkError::FrameSetup(_))));
}

#[test]
fn failing_shader_skips_only_its_pass() {
    let mut host = host();
    host.fail_shader("quadAA");
    let mut npr = watercolor(&mut host);

    npr.render(&mut host).unwrap();
    npr.render(&mut host).unwrap();

    assert_eq!(host.quad_draws().count(), 2 * (WATERCOLOR_QUADS - 1));
    assert_eq!(npr.pass(ANTIALIASING_PASS).unwrap().state(), PassState::Uninitialized);
    assert_eq!(npr.pass(DEBUGGER_PASS).unwrap().state(), PassState::Active);
}

#[test]
fn failed_target_is_reacquired_and_rebound() {
    let mut host = host();
    host.fail_target("edgeTarget");
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();
    assert!(npr.targets().target_by_name("edgeTarget").is_none());

    host.heal_target("edgeTarget");
    npr.update(&mut host).unwrap();

    let edge = npr.targets().target_by_name("edgeTarget");
    assert!(edge.is_some());
    assert_eq!(npr.quad_pass(SEPARABLE_H).unwrap().params().target("gEdgeTex"), edge);
    assert_eq!(npr.targets().operation_outputs(EDGE_DETECTION_PASS), [edge]);
}

#[test]
fn failing_target_does_not_rebatch_steady_frames() {
    let mut host = host();
    host.fail_target("edgeTarget");
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();
    assert_eq!(host.target_batches.len(), 1);
    assert_eq!(host.target_batches[0].len(), 15);

    for _ in 0..5 {
        npr.update(&mut host).unwrap();
    }

    assert_eq!(host.target_batches.len(), 1);
    assert!(npr.targets().target_by_name("edgeTarget").is_none());
}

#[test]
fn rejected_target_batch_stays_pending() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.update(&mut host).unwrap();
    host.clear_log();

    host.fail_target_updates(true);
    npr.change_color_depth(ColorDepth::Bits32);
    npr.update(&mut host).unwrap();
    assert!(host.target_batches.is_empty());

    host.fail_target_updates(false);
    npr.update(&mut host).unwrap();

    assert_eq!(host.target_batches.len(), 1);
    let present = npr.targets().target_by_name(PRESENT_TARGET).unwrap();
    assert_eq!(host.target_desc(present).unwrap().format, wgpu::TextureFormat::Rgba32Float);

    npr.update(&mut host).unwrap();
    assert_eq!(host.target_batches.len(), 1);
}

#[test]
fn teardown_releases_every_host_resource() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.render(&mut host).unwrap();
    assert!(host.live_shaders() > 0);
    assert!(host.live_samplers() > 0);

    npr.teardown(&mut host);
    npr.teardown(&mut host);

    assert_eq!(host.live_targets(), 0);
    assert_eq!(host.live_textures(), 0);
    assert_eq!(host.live_samplers(), 0);
    assert_eq!(host.live_shaders(), 0);
    assert!(!npr.is_built());
    assert!(matches!(npr.update(&mut host), Err(BrushworkError::FrameSetup(_))));
}

#[test]
fn reset_shader_instances_recompiles_on_next_frame() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    npr.render(&mut host).unwrap();
    let compiles = host.compiles;

    let reset = npr.reset_shader_instances(None, &mut host).unwrap();
    assert_eq!(reset, WATERCOLOR_QUADS);
    assert_eq!(host.live_shaders(), 0);
    assert_eq!(npr.pass(EDGE_DETECTION_PASS).unwrap().state(), PassState::ShaderReset);

    npr.render(&mut host).unwrap();
    assert_eq!(host.compiles, compiles + WATERCOLOR_QUADS);
    assert_eq!(npr.pass(EDGE_DETECTION_PASS).unwrap().state(), PassState::Active);
}

// ============================================================================
// Per-frame inputs
// ============================================================================

#[test]
fn noise_inputs_follow_wall_clock() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    host.frame_mut().unwrap().wall_clock_ms = 12_345.0;

    npr.update(&mut host).unwrap();
    let first = npr.settings().random.get();
    npr.update(&mut host).unwrap();

    assert!((npr.settings().time.scalar() - 12_345.0).abs() < 1e-3);
    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|v| (0.0..255.0).contains(v)));
    assert_eq!(npr.settings().random.get(), first);
}

#[test]
fn gamma_follows_host_unless_frozen() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    host.frame_mut().unwrap().gamma_correction = false;
    npr.update(&mut host).unwrap();
    assert!(npr.settings().host_gamma.scalar().abs() < f32::EPSILON);

    npr.set_gamma_freeze(true);
    assert!((npr.settings().npr_gamma.scalar() - 0.5).abs() < f32::EPSILON);

    host.frame_mut().unwrap().gamma_correction = true;
    npr.update(&mut host).unwrap();
    assert!(npr.settings().host_gamma.scalar().abs() < f32::EPSILON);

    npr.set_gamma_freeze(false);
    npr.update(&mut host).unwrap();
    assert!((npr.settings().host_gamma.scalar() - 1.0).abs() < f32::EPSILON);
}

// ============================================================================
// Full frame
// ============================================================================

#[test]
fn frame_draws_scene_quads_hud_then_present() {
    let mut host = host();
    let mut npr = watercolor(&mut host);

    npr.render(&mut host).unwrap();

    assert_eq!(host.scene_draws().collect::<Vec<_>>(), [GEOMETRY_PASS, UI_PASS]);
    assert_eq!(host.quad_draws().count(), WATERCOLOR_QUADS);

    let depth = npr.targets().target_by_name("depthTarget");
    let present = npr.targets().target_by_name(PRESENT_TARGET);
    assert_eq!(
        host.draws.last(),
        Some(&DrawCall::Present { color: present, depth })
    );

    let hud = host.draws.iter().find_map(|call| match call {
        DrawCall::Hud { items, targets } => Some((items, targets)),
        _ => None,
    });
    let (items, targets) = hud.unwrap();
    assert_eq!(items[0].text, "Brushwork Watercolor     (wgpu)");
    assert_eq!(targets.as_slice(), [present, depth]);
}

#[test]
fn hud_stats_follow_host_wall_clock() {
    let mut host = host();
    let mut npr = watercolor(&mut host);

    let stats_after = |ms: f64, npr: &mut NprOverride, host: &mut HeadlessHost| {
        host.frame_mut().unwrap().wall_clock_ms = ms;
        host.clear_log();
        npr.render(host).unwrap();
        host.draws
            .iter()
            .find_map(|call| match call {
                DrawCall::Hud { items, .. } => Some(items[1].text.clone()),
                _ => None,
            })
            .unwrap()
    };

    for ms in [0.0, 400.0, 800.0] {
        assert!(stats_after(ms, &mut npr, &mut host).is_empty());
    }
    let stats = stats_after(1200.0, &mut npr, &mut host);

    assert_eq!(stats, "Resolution [1280, 720]      FPS: 4 -> each frame: 300000 us");
    let hud = npr.pass(HUD_PASS_NAME).unwrap().as_hud().unwrap();
    assert_eq!(hud.stats(), stats);
}

#[test]
fn disabled_pass_is_skipped() {
    let mut host = host();
    let mut npr = watercolor(&mut host);
    let index = npr.pass_index(DEBUGGER_PASS).unwrap();

    npr.set_pass_enabled(index, false).unwrap();
    npr.render(&mut host).unwrap();

    assert!(!npr.pass_enabled(index).unwrap());
    assert_eq!(host.quad_draws().count(), WATERCOLOR_QUADS - 1);
    assert_eq!(npr.pass(DEBUGGER_PASS).unwrap().state(), PassState::Uninitialized);
}
