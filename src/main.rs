use serde::{Deserialize, Serialize};
use std::time::Instant;
use trajectory_interpolator::{
    interpolate_trajectory, PipelineConfig, Smoothers, Trajectory, VehicleState,
};

/// A single interpolation request.
#[derive(Deserialize)]
struct Request {
    trajectory: Trajectory,
    vehicle_state: VehicleState,
    #[serde(default)]
    config: PipelineConfig,
}

#[derive(Serialize)]
struct Response {
    trajectory: Trajectory,
    error: Option<String>,
}

/// Reads a JSON request from the file given as the first argument (or stdin),
/// runs the pipeline without external smoothers and prints the result as JSON.
/// A configuration file given as the second argument replaces the request's.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let content = match args.next() {
        Some(path) if path != "-" => std::fs::read_to_string(path)?,
        _ => std::io::read_to_string(std::io::stdin())?,
    };
    let mut request: Request = serde_json::from_str(&content)?;
    if let Some(path) = args.next() {
        request.config = PipelineConfig::load(path)?;
    }

    let start = Instant::now();
    let result = interpolate_trajectory(
        &mut request.trajectory,
        &request.vehicle_state,
        &request.config,
        &mut Smoothers::default(),
    );
    eprintln!(
        "Interpolated {} points in {:?}",
        request.trajectory.len(),
        start.elapsed()
    );

    let response = Response {
        trajectory: request.trajectory,
        error: result.err().map(|err| err.to_string()),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
