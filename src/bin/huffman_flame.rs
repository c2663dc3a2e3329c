use huffpack::{decode, encode, Container};

fn main() {
    let input: Vec<u8> = (0..100_000u32)
        .map(|i| match i % 7 {
            0..=2 => b'e',
            3 | 4 => b't',
            5 => b'a',
            _ => (i % 251) as u8,
        })
        .collect();

    for _ in 0..200 {
        let container = encode(&input).unwrap();
        let bytes = container.to_bytes();
        let parsed = Container::from_bytes(&bytes).unwrap();
        let output = decode(&parsed).unwrap();
        assert_eq!(output.len(), input.len());
    }
}
