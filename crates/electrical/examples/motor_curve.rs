use electrical::{MotorModel, MotorSpec, PowerSupply};
use simcore::units;

fn main() {
    let voltage = 12.0;
    let supply = PowerSupply::new(12.7, 0.013, 0.002);

    println!("{:<14} {:>10} {:>10} {:>10} {:>12}", "motor", "free rpm", "stall A", "peak W", "stall bus V");
    for id in MotorSpec::catalog_ids() {
        let Some(spec) = MotorSpec::lookup(id) else { continue };
        let bank = MotorModel::new(spec, 1);
        println!(
            "{:<14} {:>10.0} {:>10.1} {:>10.1} {:>12.2}",
            id,
            units::rad_per_sec_to_rpm(bank.free_speed(voltage)),
            bank.stall_current(voltage),
            bank.max_power(voltage),
            supply.branch_voltage(bank.stall_current(voltage), 1),
        );
    }

    // full curve of a four-CIM gearbox
    let cims = MotorModel::new(MotorSpec::cim(), 4);
    let curve = cims.torque_speed_curve(voltage, 11);

    println!();
    println!("{:>8} {:>9} {:>9} {:>9} {:>6}", "rpm", "torque", "current", "power", "eff");
    for i in 0..curve.speeds.len() {
        println!(
            "{:>8.0} {:>9.3} {:>9.1} {:>9.1} {:>6.2}",
            units::rad_per_sec_to_rpm(curve.speeds[i]),
            curve.torques[i],
            curve.currents[i],
            curve.powers[i],
            curve.efficiencies[i]
        );
    }

}
