use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;

fn main() {
    // (Variable, Type, Default value)
    let mut configs: HashMap<&str, (&str, &str)> = HashMap::from([
        ("MAC_MIN_BE", ("u8", "3")),
        ("MAC_MAX_BE", ("u8", "5")),
        ("MAC_MAX_CSMA_BACKOFFS", ("u8", "4")),
        ("MAC_MAX_FRAME_RETRIES", ("u8", "3")),
        (
            "MAC_UNIT_BACKOFF_DURATION",
            (
                "Duration",
                "Duration::from_us((UNIT_BACKOFF_PERIOD * SYMBOL_RATE_INV_US) as i64)",
            ),
        ),
        (
            "MAC_SIFS_PERIOD",
            (
                "Duration",
                "Duration::from_us((MIN_SIFS_PERIOD * SYMBOL_RATE_INV_US) as i64)",
            ),
        ),
        (
            "MAC_LIFS_PERIOD",
            (
                "Duration",
                "Duration::from_us((MIN_LIFS_PERIOD * SYMBOL_RATE_INV_US) as i64)",
            ),
        ),
        (
            "MAC_ACK_WAIT_DURATION",
            (
                "Duration",
                "Duration::from_us((ACK_WAIT_DURATION * SYMBOL_RATE_INV_US) as i64)",
            ),
        ),
        ("MAC_PAN_ID", ("u16", "0xffff")),
        ("MAC_TRANSACTION_PERSISTENCE_TIME", ("u16", "0x01f4")),
        ("BO_USED_FOR_MAC_PERS_TIME", ("u8", "0")),
        ("MAC_INDIRECT_QUEUE_CAPACITY", ("usize", "8")),
        ("MAC_EVENT_QUEUE_CAPACITY", ("usize", "8")),
        ("MAC_NOTIFICATION_QUEUE_CAPACITY", ("usize", "8")),
    ]);

    // Make sure we get rerun if needed
    println!("cargo:rerun-if-changed=build.rs");
    for name in configs.keys() {
        println!("cargo:rerun-if-env-changed=LRWPAN_{name}");
    }

    // Collect environment variables
    let mut data = String::new();
    // Write preamble
    writeln!(data, "use crate::time::Duration;").unwrap();
    writeln!(data, "use crate::phy::constants::SYMBOL_RATE_INV_US;").unwrap();
    writeln!(
        data,
        "use crate::mac::constants::{{ACK_WAIT_DURATION, MIN_LIFS_PERIOD, MIN_SIFS_PERIOD, UNIT_BACKOFF_PERIOD}};"
    )
    .unwrap();

    for (var, value) in std::env::vars() {
        if let Some(name) = var.strip_prefix("LRWPAN_") {
            // discard from hashmap as a way of consuming the setting
            let Some((_, (ty, _))) = configs.remove_entry(name) else {
                panic!("Wrong configuration name {name}");
            };

            // write to file
            writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
        }
    }

    // Take the remaining configs and write the default value to the file
    for (name, (ty, value)) in configs.iter() {
        writeln!(data, "pub const {name}: {ty} = {value};").unwrap();
    }

    // Now that we have the code of the configuration, actually write it to a file
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("config.rs");
    std::fs::write(out_file, data).unwrap();
}
