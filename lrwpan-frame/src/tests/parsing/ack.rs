use crate::*;

#[test]
fn imm_ack() {
    let data = [0x02, 0x10, 0x01];
    let frame = AckFrame::new(&data[..]).unwrap();

    let fc = frame.frame_control();
    test! {
        fc.frame_type() => FrameType::Ack,
        fc.security_enabled() => false,
        fc.frame_pending() => false,
        fc.ack_request() => false,
        fc.pan_id_compression() => false,
        fc.sequence_number_suppression() => false,
        fc.dst_addressing_mode() => AddressingMode::Absent,
        fc.frame_version() => FrameVersion::Ieee802154_2006,
        fc.src_addressing_mode() => AddressingMode::Absent,
        frame.sequence_number() => 1,
    };
}

#[test]
fn imm_ack_with_frame_pending() {
    let data = [0x12, 0x00, 0x42];
    let frame = AckFrame::new(&data[..]).unwrap();

    test! {
        frame.frame_control().frame_pending() => true,
        frame.frame_control().frame_version() => FrameVersion::Ieee802154_2003,
        frame.sequence_number() => 0x42,
    };
}

#[test]
fn wrong_length() {
    assert!(AckFrame::new(&[0x02, 0x10][..]).is_err());
    assert!(AckFrame::new(&[0x02, 0x10, 0x01, 0x00][..]).is_err());
}
