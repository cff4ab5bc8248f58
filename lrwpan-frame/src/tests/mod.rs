use super::*;

mod parsing;

#[test]
fn emit_imm_ack() {
    let frame = FrameBuilder::new_imm_ack(1).finalize().unwrap();

    assert_eq!(frame.buffer_len(), 3);

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(buffer, [0x02, 0x10, 0x01]);
}

#[test]
fn emit_data_frame_same_pan() {
    let frame = FrameBuilder::new_data(&[0xde, 0xad])
        .set_sequence_number(42)
        .set_dst_pan_id(0x1234)
        .set_dst_address(Address::Short([0x56, 0x78]))
        .set_src_pan_id(0x1234)
        .set_src_address(Address::Short([0x9a, 0xbc]))
        .finalize()
        .unwrap();

    // The source PAN ID is compressed away.
    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(
        buffer,
        [0x41, 0x88, 0x2a, 0x34, 0x12, 0x78, 0x56, 0xbc, 0x9a, 0xde, 0xad]
    );
}

#[test]
fn emit_data_frame_different_pan() {
    let frame = FrameBuilder::new_data(&[0xde, 0xad])
        .set_sequence_number(42)
        .set_dst_pan_id(0x1234)
        .set_dst_address(Address::Short([0x56, 0x78]))
        .set_src_pan_id(0x4321)
        .set_src_address(Address::Short([0x9a, 0xbc]))
        .finalize()
        .unwrap();

    // Both PAN IDs stay on the wire.
    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(
        buffer,
        [0x01, 0x88, 0x2a, 0x34, 0x12, 0x78, 0x56, 0x21, 0x43, 0xbc, 0x9a, 0xde, 0xad]
    );
}

#[test]
fn emit_broadcast_data_frame() {
    let frame = FrameBuilder::new_data(&[0x2b, 0x00, 0x00, 0x00])
        .set_sequence_number(1)
        .set_dst_pan_id(0xabcd)
        .set_dst_address(Address::BROADCAST)
        .set_src_pan_id(0xabcd)
        .set_src_address(Address::Extended([
            0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7,
        ]))
        .finalize()
        .unwrap();

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(
        buffer,
        hex::decode("41c801cdabffffc7d9b514004b12002b000000").unwrap()
    );
}

#[test]
fn emit_data_frame_dst_only() {
    let frame = FrameBuilder::new_data(&[0x01])
        .set_sequence_number(5)
        .set_dst_pan_id(0xbeef)
        .set_dst_address(Address::Short([0x00, 0x01]))
        .finalize()
        .unwrap();

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(buffer, [0x01, 0x08, 0x05, 0xef, 0xbe, 0x01, 0x00, 0x01]);
}

#[test]
fn emit_data_frame_src_only() {
    let frame = FrameBuilder::new_data(&[0xaa])
        .set_sequence_number(7)
        .set_src_pan_id(0xcafe)
        .set_src_address(Address::Short([0x12, 0x34]))
        .finalize()
        .unwrap();

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(buffer, [0x01, 0x80, 0x07, 0xfe, 0xca, 0x34, 0x12, 0xaa]);
}

#[test]
fn emit_secured_data_frame() {
    let frame = FrameBuilder::new_data(&[0x11, 0x22])
        .set_sequence_number(3)
        .set_dst_pan_id(0x1234)
        .set_dst_address(Address::Short([0x56, 0x78]))
        .set_src_pan_id(0x1234)
        .set_src_address(Address::Short([0x9a, 0xbc]))
        .set_security(AuxiliarySecurityHeaderRepr {
            security_level: 5,
            key_identifier_mode: 1,
            frame_counter: 0x01020304,
            key_source: [0; 8],
            key_index: 9,
        })
        .finalize()
        .unwrap();

    // Securing a frame upgrades the frame version.
    assert_eq!(
        frame.frame_control.frame_version,
        FrameVersion::Ieee802154_2006
    );

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(
        buffer,
        hex::decode("49980334127856bc9a0d04030201091122").unwrap()
    );
}

#[test]
fn emit_command_frame() {
    let frame = FrameBuilder::new_command(&[0x04])
        .set_sequence_number(0x1f)
        .set_ack_request(true)
        .set_dst_pan_id(0x1234)
        .set_dst_address(Address::Short([0x00, 0x01]))
        .set_src_pan_id(0x1234)
        .set_src_address(Address::Short([0x56, 0x78]))
        .finalize()
        .unwrap();

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(
        buffer,
        [0x63, 0x88, 0x1f, 0x34, 0x12, 0x01, 0x00, 0x78, 0x56, 0x04]
    );
}

#[test]
fn version_upgrade_for_large_payloads() {
    let payload = [0u8; MAX_MAC_SAFE_PAYLOAD_SIZE + 1];
    let frame = FrameBuilder::new_data(&payload)
        .set_sequence_number(1)
        .set_dst_pan_id(0x1234)
        .set_dst_address(Address::Short([0x56, 0x78]))
        .finalize()
        .unwrap();

    assert_eq!(
        frame.frame_control.frame_version,
        FrameVersion::Ieee802154_2006
    );

    let payload = [0u8; MAX_MAC_SAFE_PAYLOAD_SIZE];
    let frame = FrameBuilder::new_data(&payload)
        .set_sequence_number(1)
        .set_dst_pan_id(0x1234)
        .set_dst_address(Address::Short([0x56, 0x78]))
        .finalize()
        .unwrap();

    assert_eq!(
        frame.frame_control.frame_version,
        FrameVersion::Ieee802154_2003
    );
}

#[test]
fn finalize_without_addressing() {
    assert!(FrameBuilder::new_data(&[0x01])
        .set_sequence_number(1)
        .finalize()
        .is_err());
}

#[test]
fn reemit_parsed_frame() {
    let data = hex::decode("41c801cdabffffc7d9b514004b12002b000000").unwrap();

    let frame = Frame::new(&data[..]).unwrap();
    let repr = FrameRepr::parse(&frame).unwrap();
    repr.validate().unwrap();

    assert_eq!(repr.buffer_len(), data.len());

    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(&mut DataFrame::new_unchecked(&mut buffer[..]));

    assert_eq!(buffer, data);
}
