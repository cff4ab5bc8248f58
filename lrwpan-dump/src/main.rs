use clap::Parser;
use lrwpan_dump::FrameParser;

/// Decoder for IEEE 802.15.4 MPDUs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The IEEE 802.15.4 MPDU to decode, in hexadecimal.
    #[clap(value_parser(clap::builder::NonEmptyStringValueParser::new()))]
    input: String,

    /// Treat the last two octets as the Frame Check Sequence and verify them.
    #[arg(long)]
    fcs: bool,
}

fn main() {
    let args = Args::parse();

    let result = if args.fcs {
        FrameParser::parse_hex_with_fcs(&args.input)
    } else {
        FrameParser::parse_hex(&args.input)
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(_) => {
            eprintln!("error: not a valid IEEE 802.15.4 MPDU");
            std::process::exit(1);
        }
    }
}
