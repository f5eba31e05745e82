use mechanism::{DrivetrainParams, RunParams};
use simcore::units;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // time to cover 15 ft from rest, for a range of gearings
    let distance = units::feet_to_meters(15.0);
    let run = RunParams {
        max_distance: distance,
        ..RunParams::default().with_timing(0.001, 5.0)
    };

    println!("{:>7} {:>8} {:>10} {:>9} {:>8} {:>8}", "ratio", "time s", "speed m/s", "peak A", "min V", "mAh");
    for gear_ratio in [6.0, 8.0, 10.0, 12.75, 15.0, 20.0] {
        let params = DrivetrainParams {
            gear_ratio,
            run: run.clone(),
            ..Default::default()
        };
        let mut engine = params.build()?;
        engine.calc();

        let summary = engine.summary();
        let time = if summary.final_position >= distance {
            format!("{:.3}", summary.final_time)
        } else {
            "-".to_string()
        };
        println!(
            "{:>7.2} {:>8} {:>10.3} {:>9.1} {:>8.2} {:>8.1}",
            gear_ratio,
            time,
            summary.final_velocity,
            summary.peak_current,
            summary.min_branch_voltage,
            summary.total_energy
        );
    }

    Ok(())
}
