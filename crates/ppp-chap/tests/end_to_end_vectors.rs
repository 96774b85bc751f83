use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use ppp_chap::mschapv2::mppe::session_keys_128bit;
use ppp_chap::{chap, mschapv1, mschapv2, ChapError};

fn hex_bytes(s: &str) -> Vec<u8> {
    hex::decode(s).expect("valid hex")
}

const NT_RESPONSE: &str = "82309ECD8D708B5EA08FAA3981CD83544233114A3D85D6DF";
const PEER_CHALLENGE: &str = "21402324255E262A28295F2B3A337C7E";
const AUTH_CHALLENGE: &str = "5B5D7C7D7B3F2F3E3C2C602132262628";

#[test]
fn chap_md5_response() {
    let challenge = hex_bytes("c49c74a7d3f8fa006ea57190f28ab34c");
    let response = chap::challenge_response(0x01, b"MyPw", &challenge);
    assert_eq!(BASE64.encode(response), "giwrxlSx0Kjb6oc3+73eDg==");
}

#[test]
fn mschapv1_lm_response() {
    let challenge = hex_bytes("bd332a369b6d33e7");
    let response = mschapv1::lm_challenge_response(&challenge, "MyPw").expect("lm response");
    assert_eq!(BASE64.encode(response), "lrdNlCKhor03G7XsxVsNlZeh7vMaKe53");
}

#[test]
fn mschapv1_nt_response() {
    let challenge = hex_bytes("102db5df085d3041");
    let response = mschapv1::nt_challenge_response(&challenge, "MyPw").expect("nt response");
    assert_eq!(BASE64.encode(response), "Tp08j5z9OF1b9NMkZ5GVbKTDUatAmj1h");
}

#[test]
fn mschapv2_authenticator_response() {
    let response = mschapv2::generate_authenticator_response(
        "clientPass",
        &hex_bytes(NT_RESPONSE),
        &hex_bytes(PEER_CHALLENGE),
        &hex_bytes(AUTH_CHALLENGE),
        "User",
    )
    .expect("authenticator response");
    assert_eq!(response, "S=407A5589115FD0D6209F510FE9C04566932CDA56");
}

#[test]
fn mschapv2_session_keys_128bit() {
    let keys = session_keys_128bit("clientPass", &hex_bytes(NT_RESPONSE)).expect("keys");
    assert_eq!(keys.send, hex_bytes("8b7cdc149b993a1ba118cb153f56dccb"));
    assert_eq!(keys.recv, hex_bytes("d5f0e9521e3ea9589645e86051c82226"));
}

#[test]
fn mschapv2_authenticator_response_signals_short_inputs() {
    let nt = hex_bytes(NT_RESPONSE);
    let peer = hex_bytes(PEER_CHALLENGE);
    let auth = hex_bytes(AUTH_CHALLENGE);

    let cases: [(&[u8], &[u8], &[u8]); 3] = [
        (&nt[..23], &peer, &auth),
        (&nt, &peer[..15], &auth),
        (&nt, &peer, &auth[..15]),
    ];
    for (nt, peer, auth) in cases {
        let res = mschapv2::generate_authenticator_response("clientPass", nt, peer, auth, "User");
        assert!(
            matches!(res, Err(ChapError::InvalidLength { .. })),
            "expected a length failure, got {res:?}"
        );
    }
}

#[test]
fn peer_and_authenticator_agree_end_to_end() {
    let peer = hex_bytes(PEER_CHALLENGE);
    let auth = hex_bytes(AUTH_CHALLENGE);

    // Peer computes its NT-Response.
    let nt = mschapv2::generate_nt_response(&auth, &peer, "User", "clientPass").expect("nt");
    assert_eq!(nt.to_vec(), hex_bytes(NT_RESPONSE));

    // Authenticator verifies it and answers.
    mschapv2::verify_nt_response(&auth, &peer, "User", "clientPass", &nt).expect("verify");
    let success =
        mschapv2::generate_authenticator_response("clientPass", &nt, &peer, &auth, "User")
            .expect("authenticator response");

    // Peer checks the answer.
    mschapv2::check_authenticator_response("clientPass", &nt, &peer, &auth, "User", &success)
        .expect("authenticator verified");
}
