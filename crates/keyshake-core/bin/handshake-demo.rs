//! Runs a complete handshake between two in-process endpoints.
//!
//! Each endpoint derives separate "encoder" and "decoder" entropy: the client
//! encoder pairs with the server decoder and vice versa.

use keyshake_core::{compute_shared_entropy, create_session, get_local_public_key, Result};

fn main() {
    tracing_subscriber::fmt::init();

    // Every session and entropy value is dropped inside `run`, so exiting
    // here cannot skip their zeroization.
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!("Handshake failed ({}): {}", e.kind(), e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(true)` if both directions derived matching entropy.
fn run() -> Result<bool> {
    let mut client_encoder = create_session("client-encoder")?;
    let mut client_decoder = create_session("client-decoder")?;
    let mut server_encoder = create_session("server-encoder")?;
    let mut server_decoder = create_session("server-decoder")?;

    // Public keys are the only values that cross the wire.
    let client_encoder_key = get_local_public_key(&client_encoder);
    let client_decoder_key = get_local_public_key(&client_decoder);
    let server_encoder_key = get_local_public_key(&server_encoder);
    let server_decoder_key = get_local_public_key(&server_decoder);

    let client_encoder_entropy = compute_shared_entropy(&mut client_encoder, &server_decoder_key)?;
    let server_decoder_entropy = compute_shared_entropy(&mut server_decoder, &client_encoder_key)?;
    let client_decoder_entropy = compute_shared_entropy(&mut client_decoder, &server_encoder_key)?;
    let server_encoder_entropy = compute_shared_entropy(&mut server_encoder, &client_decoder_key)?;

    let upstream_ok = *client_encoder_entropy == *server_decoder_entropy;
    let downstream_ok = *client_decoder_entropy == *server_encoder_entropy;

    tracing::info!(
        "Client -> server entropy {}",
        if upstream_ok { "matches" } else { "DIFFERS" }
    );
    tracing::info!(
        "Server -> client entropy {}",
        if downstream_ok { "matches" } else { "DIFFERS" }
    );

    Ok(upstream_ok && downstream_ok)
}
