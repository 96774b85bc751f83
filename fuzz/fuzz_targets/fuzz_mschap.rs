#![no_main]

use libfuzzer_sys::fuzz_target;

use ppp_chap::mschapv2::password_change::decrypt_new_password;
use ppp_chap::{mschapv1, mschapv2};

/// Split `data` into the next `len` bytes (or whatever is left) and the remainder.
fn take(data: &[u8], len: usize) -> (&[u8], &[u8]) {
    data.split_at(len.min(data.len()))
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };

    // Two selector nibbles shave the field lengths around their mandated sizes so both the
    // valid and the length-rejecting paths are reached.
    let (nt_response, rest) = take(rest, 20 + usize::from(selector & 0x0F));
    let (peer, rest) = take(rest, 12 + usize::from(selector >> 4));
    let (auth, rest) = take(rest, 16);
    let password = String::from_utf8_lossy(rest);

    let _ = mschapv2::generate_authenticator_response(&password, nt_response, peer, auth, "user");
    let _ = mschapv2::verify_nt_response(auth, peer, "user", &password, nt_response);
    let _ = mschapv2::mppe::session_keys_64bit(&password, nt_response);
    let _ = mschapv2::mppe::session_keys_128bit(&password, nt_response);
    let _ = mschapv1::lm_challenge_response(peer, &password);

    let received = String::from_utf8_lossy(rest);
    let _ = mschapv2::check_authenticator_response(
        "pw",
        nt_response,
        peer,
        auth,
        "user",
        &received,
    );

    let hash = mschapv1::nt_password_hash(&password);
    let _ = decrypt_new_password(data, &hash);
    if let Some(block) = data.get(..ppp_chap::ENCRYPTED_PASSWORD_BLOCK_LEN) {
        let _ = decrypt_new_password(block, &hash);
    }
});
