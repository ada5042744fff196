//! Designs a three-disk device that shows the glyphs H, W, 2 and 3 through
//! an eight-sector, seven-window stack, one glyph per rotation setting.
//!
//! Run with `RUST_LOG=opticon=debug` to watch the propagation rounds.

use std::time::Duration;

use opticon::model::{problem::Problem, solution::Outcome, solve::solve_within};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let images = vec![
        // H
        vec![
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 50],
            vec![50, 50, 0, 50, 50, 50, 0],
            vec![0, 0, 0, 0, 50, 0, 50],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 50],
            vec![50, 50, 0, 50, 50, 50, 0],
            vec![0, 0, 0, 0, 50, 0, 50],
        ],
        // W
        vec![
            vec![50, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 50],
            vec![0, 0, 0, 50, 50, 0, 0],
            vec![50, 0, 50, 50, 0, 0, 0],
            vec![0, 0, 50, 0, 50, 0, 0],
            vec![50, 0, 50, 50, 50, 0, 0],
            vec![0, 0, 50, 50, 0, 0, 0],
            vec![0, 0, 0, 0, 50, 0, 50],
        ],
        // 2
        vec![
            vec![0, 0, 50, 50, 0, 0, 0],
            vec![50, 50, 50, 50, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 50, 50, 0],
            vec![50, 50, 0, 50, 50, 50, 50],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 50, 50, 0, 0, 0],
        ],
        // 3
        vec![
            vec![0, 0, 0, 0, 50, 50, 0],
            vec![0, 0, 0, 0, 50, 50, 0],
            vec![50, 50, 50, 0, 0, 0, 0],
            vec![0, 0, 50, 0, 0, 50, 0],
            vec![0, 0, 0, 0, 50, 50, 0],
            vec![0, 0, 0, 0, 50, 50, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 50, 0],
        ],
    ];

    let problem = Problem::new(3, 8, 7, 8, images)?;
    let result = solve_within(&problem, Duration::from_secs(600))?;

    match result.outcome {
        Outcome::Satisfied => {
            let design = result.design.as_ref().expect("satisfied solves carry a design");
            println!("{}", serde_json::to_string_pretty(&result)?);
            eprintln!("solved in {:.1}s", result.wall_time);

            let reconstructed = design.reconstruct(&problem);
            for (m, image) in reconstructed.iter().enumerate() {
                eprintln!("image {m}:");
                for row in image {
                    eprintln!(
                        "    {}",
                        row.iter()
                            .map(|b| format!("{b:>3}"))
                            .collect::<Vec<_>>()
                            .join(" ")
                    );
                }
            }
        }
        Outcome::Infeasible => eprintln!("no design exists for these images"),
        Outcome::Unknown => eprintln!(
            "gave up after {:.1}s without an answer either way",
            result.wall_time
        ),
    }

    Ok(())
}
