use std::{env, fs, sync::Arc};

use eyre::{bail, WrapErr};
use gatesim::{
    io::{self, SaveState, SimulationState},
    render::HeadlessRenderer,
    RendererSignal, RestoreOptions, Restorer, TemplateRegistry,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: inspect <snapshot.ron> [options.ron]");
    };

    let options = match args.next() {
        Some(path) => {
            let text = fs::read_to_string(&path).wrap_err_with(|| format!("reading {path}"))?;
            io::from_ron::<RestoreOptions>(&text).wrap_err_with(|| format!("parsing {path}"))?
        }
        None => RestoreOptions::default(),
    };

    let text = fs::read_to_string(&path).wrap_err_with(|| format!("reading {path}"))?;
    let simulation = match io::from_ron::<SaveState>(&text) {
        Ok(save) => save.simulation,
        Err(_) => io::from_ron::<SimulationState>(&text)
            .wrap_err_with(|| format!("parsing {path}"))?,
    };

    let templates = TemplateRegistry::with_builtins();
    let signal = RendererSignal::new();
    let restored = Restorer::new(&templates, &signal)
        .with_options(options)
        .simulation(&simulation)?;

    // no real renderer here; a headless one settles deferred heights
    let fixed = signal.publish(Some(Arc::new(HeadlessRenderer::default())));

    let simulation = &restored.simulation;
    info!(
        name = %simulation.name,
        mode = ?simulation.mode,
        gates = simulation.gate_count(),
        wires = simulation.wires().len(),
        heights_fixed = fixed,
        "restored"
    );

    for gate in simulation.gates() {
        let pins = &gate.template().pins;
        println!(
            "gate {} ({}) in={} out={} scale={:?}",
            gate.id,
            gate.template().name(),
            pins.inputs,
            pins.outputs,
            gate.transform().scale
        );
    }
    for dropped in &restored.dropped_wires {
        println!("{dropped}");
    }

    Ok(())
}
