use mqttwire::error::{MqttError, Result};
use mqttwire::packet::{
    dispatch, Connect, ConnectParameters, Disconnect, FixedHeader, Incoming, LastWill, PacketType, Pingreq, Puback,
    Pubcomp, Publish, PublishAck, Pubrec, Pubrel, Subscribe, Unsubscribe, WritablePacket,
};
use mqttwire::types::{ConnectReturnCode, QoS, SubscribeReturnCode, Topic, TopicName};

/// Checks that `reply` is accepted by `request` and that the registry resolves it to the announced type.
fn run_exchange<P: WritablePacket>(request: &P, reply: &[u8]) -> Result<P::Answer> {
    let expected = request.expected_answer();
    assert!(request.should_expect_answer());

    let incoming = dispatch(reply)?;
    assert_eq!(expected, Some(incoming.packet_type()));

    request.expect_answer(reply)
}

#[test]
fn connect_with_everything() -> Result<()> {
    let will = LastWill::new(Topic::with_qos("status/client-7", QoS::AtLeastOnce)?, b"offline".to_vec())?
        .retain(true);
    let parameters = ConnectParameters::new("client-7")?
        .keep_alive(15)
        .clean_session(true)
        .will(will)
        .credentials("admin", Some(b"hunter2".to_vec()))?;
    let connect = Connect::new().with_parameters(parameters);

    let bytes = connect.encode()?;
    assert_eq!(0x10, bytes[0]);
    assert_eq!(Ok(Some(bytes.len())), FixedHeader::frame_len(&bytes));
    // protocol name, level, flags, keep alive
    assert_eq!(&[0, 4, b'M', b'Q', b'T', b'T', 4, 0b11101110, 0, 15], &bytes[2..12]);

    let connack = run_exchange(&connect, &[0x20, 0x02, 0x00, 0x00])?;
    assert_eq!(ConnectReturnCode::Accepted, connack.return_code());
    assert!(!connack.session_present());
    Ok(())
}

#[test]
fn connect_refused() -> Result<()> {
    let connect = Connect::new().with_parameters(ConnectParameters::new("x")?);
    let connack = run_exchange(&connect, &[0x20, 0x02, 0x00, 0x02])?;
    assert_eq!(ConnectReturnCode::IdentifierRejected, connack.return_code());
    assert!(connack.return_code().is_err());
    Ok(())
}

#[test]
fn connect_never_accepts_other_packets() -> Result<()> {
    let connect = Connect::new().with_parameters(ConnectParameters::new("x")?);
    // a perfectly valid SUBACK is still not a CONNACK
    let res = connect.expect_answer(&[0x90, 0x03, 0x00, 0x01, 0x00]);
    assert!(matches!(res, Err(MqttError::MalformedPacket(_))));
    Ok(())
}

#[test]
fn publish_qos1_flow() -> Result<()> {
    let publish = Publish::new("sensors/kitchen/temp", b"21.5".to_vec())?.with_qos(QoS::AtLeastOnce, 77)?;
    let ack = run_exchange(&publish, &Puback::new(77).encode()?)?;
    assert_eq!(PublishAck::Puback(Puback::new(77)), ack);
    Ok(())
}

#[test]
fn publish_qos2_flow() -> Result<()> {
    let publish = Publish::new("sensors/kitchen/temp", b"21.5".to_vec())?.with_qos(QoS::ExactlyOnce, 78)?;

    let ack = run_exchange(&publish, &[0x50, 0x02, 0x00, 78])?;
    let pubrel = match ack {
        PublishAck::Pubrec(pubrec) => Pubrel::new(pubrec.packet_identifier()),
        other => panic!("expected PUBREC, got {:?}", other),
    };
    assert_eq!(vec![0x62, 0x02, 0x00, 78], pubrel.encode()?);

    // a completion for some other message does not finish this flow
    assert!(matches!(pubrel.expect_answer(&[0x70, 0x02, 0x00, 79]), Err(MqttError::MalformedPacket(_))));

    let pubcomp = run_exchange(&pubrel, &[0x70, 0x02, 0x00, 78])?;
    assert_eq!(Pubcomp::new(78), pubcomp);
    Ok(())
}

#[test]
fn publish_qos0_has_no_answer() -> Result<()> {
    let publish = Publish::new("a", vec![])?;
    assert!(!publish.should_expect_answer());
    assert_eq!(None, publish.expected_answer());
    assert_eq!(Err(MqttError::NoAnswerExpected(PacketType::PUBLISH)), publish.expect_answer(&[0x40, 0x02, 0x00, 0x01]));
    Ok(())
}

#[test]
fn incoming_qos2_publish() -> Result<()> {
    // server delivers with QoS 2, client answers PUBREC and expects PUBREL
    let delivered = Publish::new("news", b"extra".to_vec())?.with_qos(QoS::ExactlyOnce, 9)?.encode()?;

    let publish = match dispatch(&delivered)? {
        Incoming::Publish(p) => p,
        other => panic!("expected PUBLISH, got {:?}", other),
    };
    assert_eq!("news", publish.topic_name());
    assert_eq!(b"extra", publish.payload());

    let pubrec = Pubrec::new(publish.packet_identifier().unwrap_or_default());
    let pubrel = run_exchange(&pubrec, &[0x62, 0x02, 0x00, 0x09])?;
    assert_eq!(9, pubrel.packet_identifier());

    assert!(!Pubcomp::new(9).should_expect_answer());
    Ok(())
}

#[test]
fn subscribe_and_unsubscribe() -> Result<()> {
    let subscribe = Subscribe::new(3, vec![
        Topic::new("sensors/+/temp")?,
        Topic::with_qos("alerts/#", QoS::AtMostOnce)?,
    ])?;
    let suback = run_exchange(&subscribe, &[0x90, 0x04, 0x00, 0x03, 0x01, 0x80])?;
    assert_eq!(
        &[SubscribeReturnCode::Granted(QoS::AtLeastOnce), SubscribeReturnCode::Failure],
        suback.return_codes());

    let unsubscribe = Unsubscribe::new(4, vec![TopicName::new("sensors/+/temp")?])?;
    let unsuback = run_exchange(&unsubscribe, &[0xB0, 0x02, 0x00, 0x04])?;
    assert_eq!(4, unsuback.packet_identifier());
    Ok(())
}

#[test]
fn ping_and_disconnect() -> Result<()> {
    run_exchange(&Pingreq, &[0xD0, 0x00])?;

    assert_eq!(vec![0xE0, 0x00], Disconnect.encode()?);
    assert!(!Disconnect.should_expect_answer());
    Ok(())
}

#[test]
fn frames_in_a_stream() -> Result<()> {
    let mut stream = Vec::new();
    stream.extend_from_slice(&[0x20, 0x02, 0x00, 0x00]);
    stream.extend_from_slice(&[0x90, 0x03, 0x00, 0x01, 0x02]);
    stream.extend_from_slice(&[0xD0]);

    let mut types = Vec::new();
    let mut rest = &stream[..];
    while let Some(len) = FixedHeader::frame_len(rest)? {
        types.push(dispatch(&rest[..len])?.packet_type());
        rest = &rest[len..];
    }

    assert_eq!(vec![PacketType::CONNACK, PacketType::SUBACK], types);
    assert_eq!(&[0xD0_u8], rest);
    Ok(())
}
