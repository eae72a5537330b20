// skylark_sim/src/main.rs

use bevy::prelude::*;
use bevy::window::ExitCondition;
use clap::Parser;

use skylark_sim::cli::Cli;
use skylark_sim::simulation::config;
use skylark_sim::SkylarkSimulationPlugin;

fn main() {
    let cli = Cli::parse();
    // A broken scenario file is a startup error; load_scenario panics with
    // the offending path.
    let scenario = config::load_scenario(&cli.scenario);

    let mut app = App::new();
    if cli.headless {
        // No window, but asset loading and the scene graph still work.
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: None,
            exit_condition: ExitCondition::DontExit,
            ..default()
        }));
    } else {
        app.add_plugins(DefaultPlugins);
    }

    app.insert_resource(scenario)
        .insert_resource(cli)
        .add_plugins(SkylarkSimulationPlugin)
        .run();
}
