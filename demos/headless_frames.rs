//! Runs a few stylized frames against the headless host and prints what the
//! graph submitted.
//!
//! ```text
//! RUST_LOG=brushwork=debug cargo run --example headless_frames -- preset.json
//! ```
//!
//! The optional argument is a JSON preset of configuration values.

use glam::{Mat4, Vec3};

use brushwork::host::headless::{DrawCall, HeadlessHost, HeadlessMesh};
use brushwork::renderer::settings::DEFAULT_SUBSTRATE_TEXTURE;
use brushwork::{Command, CommandOutput, ConfigNode, ConfigValues, NprOverride, PipelineConfig, StyleId, dispatch};

const FRAMES: u32 = 8;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut values = match std::env::args().nth(1) {
        Some(path) => ConfigValues::load(path)?,
        None => ConfigValues::default(),
    };

    let mut host = HeadlessHost::new();
    host.add_virtual_texture(&values.substrate_texture, 2048, 2048);
    host.add_virtual_texture(DEFAULT_SUBSTRATE_TEXTURE, 2048, 2048);
    host.add_mesh(HeadlessMesh::new(
        Mat4::IDENTITY,
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
    ));

    let config = PipelineConfig {
        initial_style: values.style,
        ..PipelineConfig::default()
    };
    let mut npr = NprOverride::new(config, &mut host)?;
    let mut node = ConfigNode::new();
    node.register(&mut host);

    for frame in 0..FRAMES {
        if frame == FRAMES / 2 {
            values.style = if values.style == StyleId::Oil { StyleId::Watercolor } else { StyleId::Oil };
        }
        if let Some(ctx) = host.frame_mut() {
            ctx.timeline_ms = f64::from(frame) * 1000.0 / 24.0;
            ctx.wall_clock_ms = f64::from(frame) * 16.6;
        }

        node.evaluate(&mut npr, &values, &mut host);
        host.clear_log();
        npr.render(&mut host)?;

        let quads = host.quad_draws().count();
        let presented = host.draws.iter().any(|d| matches!(d, DrawCall::Present { color: Some(_), .. }));
        println!(
            "frame {frame}: {} / {quads} quad draws / presented: {presented}",
            npr.settings().style
        );
    }

    if let CommandOutput::Names(passes) = dispatch(Some(&mut npr), &mut node, Command::ListPasses, &mut host)? {
        println!("\n{} passes:", passes.len());
        for (i, name) in passes.iter().enumerate() {
            println!("  {i:2} {name}");
        }
    }

    npr.teardown(&mut host);
    node.deregister(&mut host);
    println!(
        "\nafter teardown: {} targets, {} textures, {} shaders alive",
        host.live_targets(),
        host.live_textures(),
        host.live_shaders()
    );
    Ok(())
}
