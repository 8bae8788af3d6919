//! A library representing the client side of the MQTT v3.1.1 protocol with a focus on encoding to and decoding from
//! bytes.
//!
//! Whenever documentation in this crate refers to a normative statement like `MQTT-3.1.3-3`, it refers to the
//! official [OASIS MQTT v3.1.1 standard](https://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html).
//!
//! The crate does no I/O. Packets a client sends are turned into bytes with
//! [packet::WritablePacket::encode()], and bytes read from the network are turned back into packets either through
//! the request they answer ([packet::WritablePacket::expect_answer()]) or through [packet::dispatch()].
//!
//! ```
//! use mqttwire::packet::{Connect, ConnectParameters, WritablePacket};
//!
//! let connect = Connect::new().with_parameters(ConnectParameters::new("client-0").unwrap().keep_alive(30));
//! let bytes = connect.encode().unwrap();
//! // ... write bytes, read the answer ...
//! let connack = connect.expect_answer(&[0x20, 0x02, 0x00, 0x00]).unwrap();
//! assert!(!connack.return_code().is_err());
//! ```
//!
//! Events are emitted through [tracing], installing a subscriber is up to the application.

pub mod error;
pub mod packet;
pub mod types;
