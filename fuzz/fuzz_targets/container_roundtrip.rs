#![no_main]
use huffpack::{decode, encode, Container, Error, FrequencyTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, Vec<u8>)| {
    let (input, garbage) = data;

    match encode(&input) {
        Ok(container) => {
            let parsed = Container::from_bytes(&container.to_bytes()).unwrap();
            assert_eq!(parsed, container);
            assert_eq!(decode(&parsed).unwrap(), input);
        }
        Err(Error::EmptyInput) => assert!(input.is_empty()),
        Err(Error::InsufficientAlphabet { distinct }) => {
            assert_eq!(distinct, FrequencyTable::from_bytes(&input).distinct());
            assert!(distinct < 2);
        }
        Err(e) => panic!("unexpected encode error: {e}"),
    }

    // Arbitrary bytes must parse-and-decode or fail cleanly, never panic.
    if let Ok(container) = Container::from_bytes(&garbage) {
        let _ = decode(&container);
    }
});
