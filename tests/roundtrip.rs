use fano::{decode, encode, CodeTable, FrequencyList};
use std::{env, fs};

/// The linear scan decoder is quadratic-ish, keep the sample small.
const SAMPLE: usize = 1 << 15;

#[derive(Clone, Copy, Debug)]
enum Matcher {
    Scan,
    Tree,
}

#[test]
fn roundtrip_all() {
    let file = env::args().next().unwrap();
    dbg!(&file);
    let data = fs::read(file).unwrap();

    for &matcher in &[Matcher::Scan, Matcher::Tree] {
        for &offset in &[0, data.len() / 2] {
            let end = (offset + SAMPLE).min(data.len());
            assert_roundtrips(&data[offset..end], matcher);
        }

        // Narrow the alphabet to get longer runs and fewer symbols.
        for bit_width in (1..8).rev() {
            let data: Vec<_> = data[..SAMPLE.min(data.len())]
                .iter()
                .map(|b| b & ((1 << bit_width) - 1))
                .collect();
            assert_roundtrips(&data, matcher);
        }
    }
}

#[test]
fn roundtrip_text() {
    let text = "Die Shannon-Fano-Kodierung ist eine Entropiekodierung. \
                Die Zeichen werden nach ihrer Häufigkeit sortiert und rekursiv geteilt.";
    for &matcher in &[Matcher::Scan, Matcher::Tree] {
        assert_roundtrips(text.as_bytes(), matcher);
    }
}

#[test]
fn roundtrip_small() {
    let inputs: &[&[u8]] = &[b"a", b"ab", b"aaaa", b"aabbc", b"\0\xff\0\xff", b"abcdefgh"];
    for input in inputs {
        for &matcher in &[Matcher::Scan, Matcher::Tree] {
            assert_roundtrips(input, matcher);
        }
    }
}

#[test]
fn header_matches_bit_count() {
    let data = b"Mississippi river banks";
    let list = FrequencyList::analyze(data).unwrap();
    let table = CodeTable::build(&list);
    let packed = encode::Encoder::new(&table).encode(data).unwrap();

    let total_bits = table.encoded_bits(&list);
    let packed_bytes = packed.len() - 1;
    assert_eq!(packed_bytes, (total_bits + 7) / 8);
    assert_eq!(usize::from(packed[0]), packed_bytes * 8 - total_bits);
    assert!(packed[0] <= 7);
}

fn assert_roundtrips(data: &[u8], matcher: Matcher) {
    eprintln!("Roundtrip test {:?} {}", matcher, data.len());
    let table = CodeTable::from_data(data).unwrap();
    let packed = encode::Encoder::new(&table).encode(data).unwrap();

    let decoder = match matcher {
        Matcher::Scan => decode::Decoder::new(&table),
        Matcher::Tree => decode::Decoder::with_tree_walk(&table),
    };
    let compare = decoder.decode(&packed);
    assert!(compare.is_ok(), "{:?}, {:?}", matcher, compare);
    assert!(data == &*compare.unwrap(), "{:?}", matcher);
}

#[test]
fn compress_shorthand() {
    let data = b"abracadabra";
    let (table, packed) = fano::compress(data).unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(fano::decompress(&packed, &table).unwrap(), &data[..]);
    assert_eq!(fano::compress(b"").unwrap_err(), fano::FanoError::EmptyInput);
}
