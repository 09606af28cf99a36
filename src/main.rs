//! wavesim - Headless wave combat simulation core
//!
//! Runs a wave scenario to completion and prints a summary of the result.

use wavesim::cli;
use wavesim::headless::{run_headless_scenario, ScenarioConfig};

fn main() {
    let args = cli::parse_args();

    let mut config = match ScenarioConfig::load_from_file(&args.scenario) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // CLI overrides win over the config file
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }

    match run_headless_scenario(config) {
        Ok(result) => {
            println!(
                "Scenario {:?}: {}/{} waves cleared in {:.1}s",
                result.outcome, result.waves_cleared, result.total_waves, result.duration_secs
            );
            for enemy in &result.enemies {
                println!(
                    "  {}: {} ({} damage taken, {} bursts fired)",
                    enemy.id,
                    if enemy.survived {
                        format!("survived with {} HP", enemy.final_health)
                    } else {
                        "destroyed".to_string()
                    },
                    enemy.damage_taken,
                    enemy.patterns_fired
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
