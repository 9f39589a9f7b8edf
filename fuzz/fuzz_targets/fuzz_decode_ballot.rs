#![no_main]

use libfuzzer_sys::fuzz_target;

use isaac_ballot::{decode_ballot, Codec, WireFormat};
use isaac_types::NetworkId;

// Decoding and validating arbitrary bytes must never panic, and anything
// that decodes must re-encode.
fuzz_target!(|data: &[u8]| {
    let nid = NetworkId::from("fuzz");
    for format in [WireFormat::Json, WireFormat::Binary] {
        let Ok(seal) = decode_ballot(data, &format) else {
            continue;
        };
        let _ = seal.is_valid(&nid);
        format.encode(&seal).expect("decoded seal re-encodes");
    }
});
