#[cfg(test)]
mod pipeline_tests {
    use test_case::test_case;

    use gridcode::{
        codes, encode, EncodeRequest, OutputKind, RenderPayload, SymbolBuilder, SymbolError,
        Warning, CODE39, EAN13, QRCODE,
    };

    fn request(symbology: u16, data: &[u8]) -> EncodeRequest {
        EncodeRequest { symbology, data: data.to_vec(), ..EncodeRequest::default() }
    }

    // Scenario A: linear symbology with default options
    #[test]
    fn test_code39_defaults() {
        let res = encode(&request(CODE39, b"HELLO"), OutputKind::Raster);
        assert_eq!(res.code, codes::SUCCESS);
        assert_eq!(res.height, 50);
        // 7 characters incl. start/stop at 13 modules each, minus the final
        // gap, plus a 10-module quiet zone either side
        assert_eq!(res.width, 13 * 7 - 1 + 20);
        assert!(res.payload.is_some());
    }

    #[test]
    fn test_code39_check_char_only_on_request() {
        let plain = encode(&request(CODE39, b"HELLO"), OutputKind::Raster);
        let mut req = request(CODE39, b"HELLO");
        req.option2 = 1;
        let checked = encode(&req, OutputKind::Raster);
        assert_eq!(checked.code, codes::SUCCESS);
        assert_eq!(checked.width, plain.width + 13);
    }

    // Scenario B: a 2D symbology escalates its version until the data fits
    #[test]
    fn test_matrix_version_escalation() {
        let small = SymbolBuilder::new(QRCODE, &[b'x'; 10]).build().unwrap();
        let large = SymbolBuilder::new(QRCODE, &[b'x'; 500]).build().unwrap();
        assert_eq!(small.layout.grid.width(), 21);
        // 500 bytes at level M land on version 17 (85x85 modules)
        assert_eq!(large.layout.grid.width(), 85);

        let res = encode(&request(QRCODE, &[b'x'; 500]), OutputKind::Raster);
        assert_eq!(res.code, codes::SUCCESS);
    }

    // Scenario C: data beyond the largest version's capacity
    #[test]
    fn test_matrix_capacity_exhausted() {
        // 1500 bytes fit no version at error correction level H
        let mut req = request(QRCODE, &vec![b'x'; 1500]);
        req.option1 = 4;
        let res = encode(&req, OutputKind::Raster);
        assert_eq!(res.code, codes::ERROR_ENCODING_IMPOSSIBLE);
        assert!(res.payload.is_none());
        assert!(res.message.contains("capacity"));

        let err = SymbolBuilder::new(QRCODE, &vec![b'x'; 1500])
            .option1(4)
            .build()
            .unwrap_err();
        assert!(matches!(err, SymbolError::EncodingImpossible { .. }));
    }

    #[test]
    fn test_matrix_over_absolute_maximum() {
        let res = encode(&request(QRCODE, &vec![b'x'; 3000]), OutputKind::Raster);
        assert!(res.code >= 3);
        assert!(res.payload.is_none());
    }

    // Scenario D: unknown symbology identifier
    #[test]
    fn test_unknown_symbology() {
        let res = encode(&request(9999, b"HELLO"), OutputKind::Raster);
        assert_eq!(res.code, codes::ERROR_UNKNOWN_SYMBOLOGY);
        assert!(res.payload.is_none());

        let err = SymbolBuilder::new(9999, b"HELLO").build().unwrap_err();
        assert_eq!(err, SymbolError::UnknownSymbology(9999));
    }

    // Scenario E: charset violation fails validation before any encoder runs
    #[test]
    fn test_numeric_symbology_rejects_letters() {
        let res = encode(&request(EAN13, b"59012341234A"), OutputKind::Raster);
        assert_eq!(res.code, codes::ERROR_INVALID_DATA);
        assert!(res.payload.is_none());
        assert!(res.message.contains("'A'"));
        assert!(res.message.contains("11"));

        let err = SymbolBuilder::new(EAN13, b"59012341234A").build().unwrap_err();
        assert_eq!(err, SymbolError::InvalidChar { byte: b'A', pos: 11 });
    }

    #[test]
    fn test_empty_data() {
        let res = encode(&request(CODE39, b""), OutputKind::Raster);
        assert_eq!(res.code, codes::ERROR_INVALID_DATA);
        assert!(res.payload.is_none());
    }

    #[test]
    fn test_ean13_fixed_length() {
        let res = encode(&request(EAN13, b"1234"), OutputKind::Raster);
        assert_eq!(res.code, codes::ERROR_INVALID_DATA);
        assert!(res.message.contains("12"));
    }

    #[test]
    fn test_code39_too_long() {
        let data = vec![b'A'; 87];
        let res = encode(&request(CODE39, &data), OutputKind::Raster);
        assert_eq!(res.code, codes::ERROR_TOO_LONG);
        assert!(res.message.contains("86"));
    }

    // Quiet-zone clamp: requesting zero yields a warning and the mandated
    // minimum, never an unscannable symbol
    #[test]
    fn test_quiet_zone_clamp() {
        let mut req = request(CODE39, b"HELLO");
        req.whitespace_width = 0;
        let res = encode(&req, OutputKind::Raster);
        assert_eq!(res.code, codes::WARN_QUIET_ZONE_CLAMPED);
        assert!(res.is_usable());
        let plain = encode(&request(CODE39, b"HELLO"), OutputKind::Raster);
        assert_eq!(res.width, plain.width);

        let symbol = SymbolBuilder::new(CODE39, b"HELLO").quiet_zone(0).build().unwrap();
        assert_eq!(symbol.layout.quiet_zone, 10);
        assert_eq!(
            symbol.warnings,
            vec![Warning::QuietZoneClamped { requested: 0, min: 10 }]
        );
    }

    #[test]
    fn test_layout_idempotence() {
        let a = SymbolBuilder::new(QRCODE, b"STABLE OUTPUT").scale(2.0).build().unwrap();
        let b = SymbolBuilder::new(QRCODE, b"STABLE OUTPUT").scale(2.0).build().unwrap();
        assert_eq!(a.layout, b.layout);
        assert_eq!(a.to_raster(), b.to_raster());
        assert_eq!(a.to_vector(), b.to_vector());
    }

    #[test_case(1.0; "unit scale")]
    #[test_case(2.0; "integer scale")]
    #[test_case(2.5; "fractional scale")]
    fn test_raster_and_vector_dimensions_agree(scale: f32) {
        let symbol = SymbolBuilder::new(QRCODE, b"DATA").scale(scale).build().unwrap();
        let raster = symbol.to_raster();
        let vector = symbol.to_vector();
        assert_eq!((raster.width, raster.height), (vector.width, vector.height));
        assert_eq!(raster.pixels.len(), (raster.width * raster.height * 3) as usize);
    }

    #[test]
    fn test_vector_output_kind() {
        let res = encode(&request(EAN13, b"590123412345"), OutputKind::Vector);
        assert_eq!(res.code, codes::SUCCESS);
        assert!(matches!(res.payload, Some(RenderPayload::Vector(_))));
    }

    #[test]
    fn test_hrt_band_only_when_requested() {
        let mut req = request(EAN13, b"590123412345");
        let bare = encode(&req, OutputKind::Raster);
        req.show_hrt = true;
        let with_text = encode(&req, OutputKind::Raster);
        assert_eq!(with_text.height, bare.height + 10);
    }

    // Encoding is a pure function of its inputs: same bytes, same raster
    #[test]
    fn test_random_payloads_encode_deterministically() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let len = rng.random_range(1..512);
            let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
            let a = SymbolBuilder::new(QRCODE, &data).build().unwrap().to_raster();
            let b = SymbolBuilder::new(QRCODE, &data).build().unwrap().to_raster();
            assert_eq!(a, b);
        }
    }

    // The pipeline is stateless beyond the read-only registry, so parallel
    // encodes must agree with serial ones bit for bit
    #[test]
    fn test_parallel_encodes_are_deterministic() {
        use rayon::prelude::*;

        let inputs: Vec<Vec<u8>> =
            (0..64).map(|i| format!("PAYLOAD {i}").into_bytes()).collect();
        let serial: Vec<_> = inputs
            .iter()
            .map(|d| SymbolBuilder::new(QRCODE, d).build().unwrap().to_raster())
            .collect();
        let parallel: Vec<_> = inputs
            .par_iter()
            .map(|d| SymbolBuilder::new(QRCODE, d).build().unwrap().to_raster())
            .collect();
        assert_eq!(serial, parallel);
    }
}

#[cfg(test)]
mod pipeline_proptests {
    use proptest::prelude::*;

    use gridcode::{codes, encode, EncodeRequest, OutputKind, CODE39, EAN13, QRCODE};

    fn request(symbology: u16, data: &[u8]) -> EncodeRequest {
        EncodeRequest { symbology, data: data.to_vec(), ..EncodeRequest::default() }
    }

    proptest! {
        // Every input within the declared charset and length encodes, and
        // the grid obeys the documented width formula
        #[test]
        fn proptest_code39_width_formula(data in "[0-9A-Z \\-\\.\\$/\\+%]{1,40}") {
            let res = encode(&request(CODE39, data.as_bytes()), OutputKind::Raster);
            prop_assert_eq!(res.code, codes::SUCCESS);
            let modules = 13 * (data.len() + 2) - 1;
            prop_assert_eq!(res.width as usize, modules + 20);
        }

        #[test]
        fn proptest_ean13_always_95_modules(data in "[0-9]{12}") {
            let res = encode(&request(EAN13, data.as_bytes()), OutputKind::Raster);
            prop_assert_eq!(res.code, codes::SUCCESS);
            prop_assert_eq!(res.width as usize, 95 + 2 * 11);
        }

        #[test]
        fn proptest_matrix_square_and_odd(data in prop::collection::vec(any::<u8>(), 1..200)) {
            let res = encode(&request(QRCODE, &data), OutputKind::Raster);
            prop_assert_eq!(res.code, codes::SUCCESS);
            prop_assert_eq!(res.width, res.height);
            // Width is symbol modules plus the 4-module quiet zone each side
            let modules = res.width as usize - 8;
            prop_assert_eq!(modules % 4, 1);
            prop_assert!((21..=177).contains(&modules));
        }

        // One character outside the charset always fails validation with
        // the position named
        #[test]
        fn proptest_invalid_char_position(pos in 0usize..12) {
            let mut data = b"111111111111".to_vec();
            data[pos] = b'X';
            let res = encode(&request(EAN13, &data), OutputKind::Raster);
            prop_assert_eq!(res.code, codes::ERROR_INVALID_DATA);
            prop_assert!(res.message.contains(&pos.to_string()));
        }
    }
}
