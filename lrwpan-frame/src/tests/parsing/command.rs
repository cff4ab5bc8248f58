use crate::*;

#[test]
fn data_request() {
    let data = [0x63, 0x88, 0x1f, 0x34, 0x12, 0x01, 0x00, 0x78, 0x56, 0x04];
    let frame = CommandFrame::new(&data[..]).unwrap();

    let fc = frame.frame_control();
    test! {
        fc.frame_type() => FrameType::MacCommand,
        fc.ack_request() => true,
        fc.pan_id_compression() => true,
        frame.sequence_number() => Some(0x1f),
        frame.command_id() => CommandId::DataRequest,
    };

    let addressing = frame.addressing().unwrap();
    test! {
        addressing.dst_pan_id() => Some(0x1234),
        addressing.dst_address() => Some(Address::Short([0x00, 0x01])),
        addressing.src_address() => Some(Address::Short([0x56, 0x78])),
    };

    assert_eq!(frame.payload(), Some(&[0x04][..]));
}

#[test]
fn association_request() {
    let data = hex::decode("23c80134120000ffff2e16324000a213000180").unwrap();
    let frame = CommandFrame::new(&data[..]).unwrap();

    test! {
        frame.frame_control().ack_request() => true,
        frame.frame_control().pan_id_compression() => false,
        frame.command_id() => CommandId::AssociationRequest,
    };

    let addressing = frame.addressing().unwrap();
    test! {
        addressing.dst_pan_id() => Some(0x1234),
        addressing.dst_address() => Some(Address::Short([0x00, 0x00])),
        addressing.src_pan_id() => Some(0xffff),
        addressing.src_address() => Some(Address::Extended([
            0x00, 0x13, 0xa2, 0x00, 0x40, 0x32, 0x16, 0x2e,
        ])),
    };

    // The command identifier followed by the capability information field.
    assert_eq!(frame.payload(), Some(&[0x01, 0x80][..]));
}

#[test]
fn missing_command_id() {
    // The buffer ends right after the addressing fields.
    let data = [0x63, 0x88, 0x1f, 0x34, 0x12, 0x01, 0x00, 0x78, 0x56];
    assert!(CommandFrame::new(&data[..]).is_err());
}
