//! Corpus-level packing and decoding tests.

mod common;

use common::{pair_strings, random_corpus, to_hex};
use textpack_lzw::assembler::RecordHeader;
use textpack_lzw::{
    Decoder, PackConfig, PackError, TextPacker, bootstrap, normalize, pack,
};

fn assert_roundtrip(strings: &[String], config: PackConfig) -> TextPacker {
    let mut packer = TextPacker::new(config).unwrap();
    let ids: Vec<String> = strings
        .iter()
        .map(|s| packer.assign_identifier(s).unwrap())
        .collect();
    let data = packer.as_bytes().unwrap();

    let table = bootstrap(&data, &config).expect("bootstrap failed");
    assert_eq!(table.len(), packer.dictionary().len());
    for (id, s) in ids.iter().zip(strings) {
        assert_eq!(
            table.decode(&data, id).expect("decode failed"),
            normalize(s),
            "mismatch for {s:?}"
        );
    }
    packer
}

#[test]
fn test_cat_and_dog() {
    let (ids, data) = pack(&["the cat sat", "the dog sat"], PackConfig::PICO8).unwrap();
    assert_ne!(ids[0], ids[1]);

    let table = bootstrap(&data, &PackConfig::PICO8).unwrap();
    let text = table.decode(&data, &format!("{}{}", ids[0], ids[1])).unwrap();
    assert_eq!(text, "the cat satthe dog sat");
}

#[test]
fn test_reference_layout() {
    // Bytes and identifiers as produced by the original Python packer.
    const EXPECTED: &str = "03000a003f0007b1920800f2c40030220700480007bf60884532120103004e00071ea707";

    let (ids, data) = pack(&["the cat sat", "the dog sat", "aaaa"], PackConfig::PICO8).unwrap();
    assert_eq!(ids, ["\"  ", "2  ", ">  "]);
    assert_eq!(to_hex(&data), EXPECTED);

    // The start address moves identifiers, never the data.
    let config = PackConfig::PICO8.with_window(0x1000, 0x4300);
    let (ids, data) = pack(&["The  Cat sat", "the dog sat", "AAAA"], config).unwrap();
    assert_eq!(ids, ["\" !", "2 !", "> !"]);
    assert_eq!(to_hex(&data), EXPECTED);
}

#[test]
fn test_roundtrip_random_corpora() {
    for seed in 0..40 {
        let corpus = random_corpus(seed, 60, 40);
        assert_roundtrip(&corpus, PackConfig::PICO8);
    }
}

#[test]
fn test_width_growth_on_first_code_of_record() {
    // 63 base entries + 64 pairs: the next record's first insertion is
    // index 127, which grows the width from 7 to 8 mid-record.
    let mut strings = pair_strings(64);
    strings.push("hello world, hello again".to_string());
    strings.push("and once more".to_string());

    let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
    for s in &strings[..64] {
        packer.assign_identifier(s).unwrap();
    }
    assert_eq!(packer.dictionary().len(), 127);
    assert_eq!(packer.dictionary().width(), 7);

    assert_roundtrip(&strings, PackConfig::PICO8);
}

#[test]
fn test_width_growth_on_last_code_of_record() {
    // 62 pairs leave the table at 125; "xyz" inserts 125 and 126 and the
    // following record starts right below the boundary.
    let mut strings = pair_strings(62);
    strings.push("xyz".to_string());
    strings.push("xyzzy".to_string());
    strings.push("some more text".to_string());
    assert_roundtrip(&strings, PackConfig::PICO8);
}

#[test]
fn test_width_growth_at_255() {
    let mut strings = pair_strings(192);
    strings.push("crossing into nine bit codes".to_string());
    strings.push("nine bit codes".to_string());

    let packer = assert_roundtrip(&strings, PackConfig::PICO8);
    assert_eq!(packer.dictionary().width(), 9);
}

#[test]
fn test_header_width_matches_encoder_width() {
    let corpus = random_corpus(7, 200, 30);
    let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
    let mut expected = Vec::new();
    for s in &corpus {
        let before = (packer.dictionary().len(), packer.dictionary().width());
        let fresh = packer.identifier(s).is_none();
        packer.assign_identifier(s).unwrap();
        if fresh {
            expected.push(before);
        }
    }

    let data = packer.as_bytes().unwrap();
    let mut pos = 2;
    for (len, width) in expected {
        let header = RecordHeader::parse(&data[pos..], pos).unwrap();
        assert_eq!(usize::from(header.table_snapshot), len);
        assert_eq!(header.start_width, width);
        // Skip the packed codes by replaying their widths.
        let mut bits = 0u64;
        let mut w = u64::from(width);
        let mut index = u64::from(header.table_snapshot);
        for k in 0..header.code_count {
            bits += w;
            if k + 1 < header.code_count && index < 4096 {
                if index == (1 << w) - 1 {
                    w += 1;
                }
                index += 1;
            }
        }
        pos += 5 + bits.div_ceil(8) as usize;
    }
    assert_eq!(pos, data.len());
}

#[test]
fn test_capacity_ceiling() {
    let config = PackConfig::PICO8.with_window(0, 0x10000);
    let mut corpus = random_corpus(99, 800, 48);
    let mut packer = TextPacker::new(config).unwrap();
    for s in &corpus {
        packer.assign_identifier(s).unwrap();
    }
    assert_eq!(packer.dictionary().len(), 4096);
    assert!(packer.dictionary().is_full());
    assert_eq!(packer.dictionary().width(), 13);

    // More strings after the table is full still pack and decode.
    corpus.push("the table is full now".to_string());
    corpus.push("but matching still works".to_string());
    let packer = assert_roundtrip(&corpus, config);
    assert_eq!(packer.dictionary().len(), 4096);
}

#[test]
fn test_small_table_boundary() {
    for max_entries in [64u16, 65, 100, 127, 128, 129] {
        let config = PackConfig {
            max_entries,
            ..PackConfig::PICO8
        };
        let corpus = random_corpus(u64::from(max_entries), 40, 24);
        let packer = assert_roundtrip(&corpus, config);
        assert_eq!(packer.dictionary().len(), usize::from(max_entries));
    }
}

#[test]
fn test_determinism() {
    let corpus = random_corpus(3, 100, 40);
    let first = pack(&corpus, PackConfig::PICO8).unwrap();
    let second = pack(&corpus, PackConfig::PICO8).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_normalized_duplicates_share_records() {
    let (ids, data) = pack(
        &["Go North", "go   north", "GO\nNORTH", "go south"],
        PackConfig::PICO8,
    )
    .unwrap();
    assert_eq!(ids[0], ids[1]);
    assert_eq!(ids[0], ids[2]);
    assert_ne!(ids[0], ids[3]);
    assert_eq!(u16::from_le_bytes([data[0], data[1]]), 2);
}

#[test]
fn test_window_enforcement() {
    let corpus = random_corpus(11, 50, 40);
    let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
    for s in &corpus {
        packer.assign_identifier(s).unwrap();
    }
    let size = packer.as_bytes().unwrap().len();

    let tight = PackConfig::PICO8.with_window(0, (size - 1) as u32);
    let mut packer = TextPacker::new(tight).unwrap();
    for s in &corpus {
        packer.assign_identifier(s).unwrap();
    }
    match packer.as_bytes() {
        Err(PackError::TooMuchData { size: got, window, .. }) => {
            assert_eq!(got, size);
            assert_eq!(window, size - 1);
        }
        other => panic!("expected TooMuchData, got {other:?}"),
    }
}

#[test]
fn test_start_address_offsets_identifiers() {
    let corpus = random_corpus(5, 30, 20);
    assert_roundtrip(&corpus, PackConfig::PICO8.with_window(0x1000, 0x4300));
}

#[test]
fn test_decoder_concurrent_lookups() {
    let corpus = random_corpus(21, 80, 30);
    let (ids, data) = pack(&corpus, PackConfig::PICO8).unwrap();
    let decoder = Decoder::new(data, PackConfig::PICO8).unwrap();

    std::thread::scope(|scope| {
        for chunk in ids.chunks(10).zip(corpus.chunks(10)) {
            let decoder = &decoder;
            scope.spawn(move || {
                for (id, s) in chunk.0.iter().zip(chunk.1) {
                    assert_eq!(decoder.decode(id).unwrap(), normalize(s));
                }
            });
        }
    });
    assert!(decoder.is_bootstrapped());
}
