#![no_main]

use libfuzzer_sys::fuzz_target;

use isaac_ballot::{BallotFact, BinaryCodec, Codec, Fact, JsonCodec};

fuzz_target!(|data: &[u8]| {
    if let Ok(fact) = JsonCodec.decode::<Fact>(data) {
        let _ = fact.is_valid();
    }
    if let Ok(fact) = BinaryCodec.decode::<Fact>(data) {
        let _ = fact.is_valid();
        BinaryCodec.encode(&fact).expect("decoded fact re-encodes");
    }
});
