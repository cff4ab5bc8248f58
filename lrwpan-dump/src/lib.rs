use colored::*;
use lrwpan_frame::*;

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn decrease_indent(&mut self) {
        self.indent -= 2;
    }

    fn write(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
    }

    fn writeln(&mut self, s: String) {
        self.write(s);
        self.buffer.push('\n');
    }
}

pub struct FrameParser {}

impl FrameParser {
    pub fn parse_hex(input: &str) -> Result<String> {
        let data = hex::decode(input).map_err(|_| Error)?;
        Self::parse(&data)
    }

    pub fn parse_hex_with_fcs(input: &str) -> Result<String> {
        let data = hex::decode(input).map_err(|_| Error)?;
        Self::parse_with_fcs(&data)
    }

    /// Dump an MPDU without its Frame Check Sequence.
    pub fn parse(input: &[u8]) -> Result<String> {
        let frame = Frame::new(input)?;
        let mut buffer = String::new();
        Self::dump(&frame, &mut buffer);
        Ok(buffer)
    }

    /// Dump an MPDU whose last two octets are the Frame Check Sequence.
    ///
    /// A frame with an invalid checksum is rejected, as a receiver would
    /// drop it.
    pub fn parse_with_fcs(input: &[u8]) -> Result<String> {
        let with_fcs = FrameWithFcs::new(input)?;
        let frame = with_fcs.frame()?;
        let mut buffer = String::new();
        Self::dump(&frame, &mut buffer);

        let mut w = Writer::new(&mut buffer);
        w.writeln(format!("{}", "Frame Check Sequence".underline().bold()));
        w.increase_indent();
        w.writeln(format!("{}: {:04x}", "fcs".bold(), with_fcs.fcs()));
        w.decrease_indent();
        Ok(buffer)
    }

    fn dump(frame: &Frame<&[u8]>, buffer: &mut String) {
        let mut w = Writer::new(buffer);

        let fc = frame.frame_control();

        // -----------------------------------------------------------------
        // Frame Control
        // -----------------------------------------------------------------
        w.writeln(format!("{}", "Frame Control".underline().bold()));
        w.increase_indent();
        w.writeln(format!(
            "{}: {}",
            "frame type".bold(),
            format!("{:?}", fc.frame_type()).bright_blue(),
        ));
        w.writeln(format!(
            "{}: {}",
            "security".bold(),
            fc.security_enabled() as usize
        ));
        w.writeln(format!(
            "{}: {}",
            "frame pending".bold(),
            fc.frame_pending() as usize
        ));
        w.writeln(format!(
            "{}: {}",
            "ack request".bold(),
            fc.ack_request() as usize
        ));
        w.writeln(format!(
            "{}: {}",
            "pan id compression".bold(),
            fc.pan_id_compression() as usize
        ));
        w.writeln(format!(
            "{}: {}",
            "sequence number suppression".bold(),
            fc.sequence_number_suppression() as usize
        ));
        w.writeln(format!(
            "{}: {}",
            "information elements present".bold(),
            fc.information_elements_present() as usize
        ));
        w.writeln(format!(
            "{}: {:?}",
            "dst addressing mode".bold(),
            fc.dst_addressing_mode()
        ));
        w.writeln(format!(
            "{}: {:?}",
            "src addressing mode".bold(),
            fc.src_addressing_mode()
        ));
        w.writeln(format!(
            "{}: {} ({:?})",
            "frame version".bold(),
            fc.frame_version() as usize,
            fc.frame_version()
        ));
        w.decrease_indent();

        // -----------------------------------------------------------------
        // Sequence Number
        // -----------------------------------------------------------------
        if let Some(seq) = frame.sequence_number() {
            w.writeln(format!("{}", "Sequence Number".underline().bold()));
            w.increase_indent();
            w.writeln(format!("{}: {}", "sequence number".bold(), seq));
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // Addressing
        // -----------------------------------------------------------------
        if let Some(addr) = frame.addressing() {
            w.writeln(format!("{}", "Addressing".underline().bold()));
            w.increase_indent();

            if let Some(dst_pan_id) = addr.dst_pan_id() {
                w.writeln(format!("{}: {:x}", "dst pan id".bold(), dst_pan_id));
            }

            if let Some(dst_addr) = addr.dst_address() {
                w.writeln(format!(
                    "{}: {}{}",
                    "dst addr".bold(),
                    dst_addr,
                    if dst_addr.is_broadcast() {
                        " (broadcast)"
                    } else {
                        ""
                    }
                ));
            }

            if let Some(src_pan_id) = addr.src_pan_id() {
                w.writeln(format!("{}: {:x}", "src pan id".bold(), src_pan_id));
            }

            if let Some(src_addr) = addr.src_address() {
                w.writeln(format!(
                    "{}: {}{}",
                    "src addr".bold(),
                    src_addr,
                    if src_addr.is_broadcast() {
                        " (broadcast)"
                    } else {
                        ""
                    }
                ));
            }
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // Auxiliary Security Header
        // -----------------------------------------------------------------
        if let Some(aux) = frame.auxiliary_security_header() {
            w.writeln(format!(
                "{}",
                "Auxiliary Security Header".underline().bold()
            ));
            w.increase_indent();
            let control = aux.security_control();
            w.writeln(format!(
                "{}: {}",
                "security level".bold(),
                control.security_level().value()
            ));
            w.writeln(format!(
                "{}: {:?}",
                "key identifier mode".bold(),
                control.key_identifier_mode()
            ));
            w.writeln(format!("{}: {}", "frame counter".bold(), aux.frame_counter()));
            if let Some(key_source) = aux.key_source() {
                w.writeln(format!("{}: {:x?}", "key source".bold(), key_source));
            }
            if let Some(key_index) = aux.key_index() {
                w.writeln(format!("{}: {}", "key index".bold(), key_index));
            }
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // Command
        // -----------------------------------------------------------------
        if let Frame::Command(command) = frame {
            w.writeln(format!("{}", "Command".underline().bold()));
            w.increase_indent();
            w.writeln(format!(
                "{}: {}",
                "command id".bold(),
                format!("{:?}", command.command_id()).bright_blue()
            ));
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // Payload
        // -----------------------------------------------------------------
        if let Some(payload) = frame.payload() {
            w.writeln(format!("{}", "Payload".underline().bold()));
            w.increase_indent();
            w.writeln(format!("{:x?}", payload));
            w.decrease_indent();
        }
    }
}
