use crate::*;

#[test]
fn broadcast_data_frame() {
    let data = hex::decode("41c801cdabffffc7d9b514004b12002b000000").unwrap();
    let frame = DataFrame::new(&data[..]).unwrap();

    let fc = frame.frame_control();
    test! {
        fc.frame_type() => FrameType::Data,
        fc.security_enabled() => false,
        fc.frame_pending() => false,
        fc.ack_request() => false,
        fc.pan_id_compression() => true,
        fc.sequence_number_suppression() => false,
        fc.dst_addressing_mode() => AddressingMode::Short,
        fc.frame_version() => FrameVersion::Ieee802154_2003,
        fc.src_addressing_mode() => AddressingMode::Extended,
        frame.sequence_number() => Some(1),
    };

    let addressing = frame.addressing().unwrap();
    test! {
        addressing.dst_pan_id() => Some(0xabcd),
        addressing.dst_address() => Some(Address::BROADCAST),
        addressing.src_pan_id() => None,
        addressing.src_address() => Some(Address::Extended([
            0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7,
        ])),
    };

    assert!(frame.auxiliary_security_header().is_none());
    assert_eq!(frame.payload(), Some(&[0x2b, 0x00, 0x00, 0x00][..]));
}

#[test]
fn compressed_pan_data_frame() {
    let data = [
        0x41, 0x88, 0x2a, 0x34, 0x12, 0x78, 0x56, 0xbc, 0x9a, 0xde, 0xad,
    ];
    let frame = DataFrame::new(&data[..]).unwrap();

    let addressing = frame.addressing().unwrap();
    test! {
        addressing.dst_pan_id() => Some(0x1234),
        addressing.dst_address() => Some(Address::Short([0x56, 0x78])),
        addressing.src_pan_id() => None,
        addressing.src_address() => Some(Address::Short([0x9a, 0xbc])),
    };

    assert_eq!(frame.payload(), Some(&[0xde, 0xad][..]));
}

#[test]
fn secured_data_frame() {
    let data = hex::decode("49980334127856bc9a0d04030201091122").unwrap();
    let frame = DataFrame::new(&data[..]).unwrap();

    let fc = frame.frame_control();
    test! {
        fc.security_enabled() => true,
        fc.frame_version() => FrameVersion::Ieee802154_2006,
    };

    let header = frame.auxiliary_security_header().unwrap();
    test! {
        header.len() => 6,
        header.frame_counter() => 0x01020304,
        header.key_index() => Some(9),
        header.security_control().security_level().mic_length() => 4,
    };

    assert_eq!(frame.payload(), Some(&[0x11, 0x22][..]));
}

#[test]
fn secured_frame_without_header_is_rejected() {
    // Security bit set, but the buffer ends before the auxiliary security
    // header is complete.
    let data = [0x49, 0x98, 0x03, 0x34, 0x12, 0x78, 0x56, 0xbc, 0x9a, 0x0d];
    assert!(DataFrame::new(&data[..]).is_err());
}

#[test]
fn dst_only_data_frame() {
    let data = [0x01, 0x08, 0x05, 0xef, 0xbe, 0x01, 0x00, 0x01];
    let frame = DataFrame::new(&data[..]).unwrap();

    let addressing = frame.addressing().unwrap();
    test! {
        addressing.dst_pan_id() => Some(0xbeef),
        addressing.dst_address() => Some(Address::Short([0x00, 0x01])),
        addressing.src_pan_id() => None,
        addressing.src_address() => None,
    };

    assert_eq!(frame.payload(), Some(&[0x01][..]));
}

#[test]
fn src_only_data_frame() {
    let data = [0x01, 0x80, 0x07, 0xfe, 0xca, 0x34, 0x12, 0xaa];
    let frame = DataFrame::new(&data[..]).unwrap();

    let addressing = frame.addressing().unwrap();
    test! {
        addressing.dst_pan_id() => None,
        addressing.dst_address() => None,
        addressing.src_pan_id() => Some(0xcafe),
        addressing.src_address() => Some(Address::Short([0x12, 0x34])),
    };

    assert_eq!(frame.payload(), Some(&[0xaa][..]));
}
