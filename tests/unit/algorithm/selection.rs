//! Tests for sequential palette selection and its anti-repetition state

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use photomosaic::MosaicError;
    use photomosaic::algorithm::selection::{SelectionPolicy, SelectionState, pick_uniform};
    use photomosaic::palette::{CatalogImage, ImageId, Palette};
    use photomosaic::raster::{Color, PixelBuffer};
    use photomosaic::spatial::{TileDescriptor, TileIterator};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gray(level: u8) -> Color {
        Color::from_argb(255, level, level, level)
    }

    fn palette_of(levels: &[u8]) -> Palette {
        let mut palette = Palette::new();
        for (id, &level) in levels.iter().enumerate() {
            let pixels = PixelBuffer::filled(1, 1, gray(level)).unwrap();
            let image = CatalogImage::new(ImageId(id as u64), format!("{id}.png"), pixels).unwrap();
            palette.add(image).unwrap();
        }
        palette
    }

    fn tiles(columns: usize, rows: usize) -> Vec<TileDescriptor> {
        TileIterator::new(columns, rows, 1).unwrap().collect()
    }

    fn run_selection(
        palette: &Palette,
        policy: SelectionPolicy,
        columns: usize,
        rows: usize,
        seed: u64,
    ) -> Vec<ImageId> {
        let mut state = SelectionState::new(policy, columns, palette.len());
        let mut rng = StdRng::seed_from_u64(seed);
        tiles(columns, rows)
            .iter()
            .map(|tile| state.select(palette, tile, gray(0), &mut rng).unwrap())
            .collect()
    }

    // Tests plain selection always takes the single nearest image
    // Verified by picking randomly among several candidates
    #[test]
    fn test_plain_selection_is_nearest() {
        let palette = palette_of(&[200, 5, 90]);

        let picks = run_selection(&palette, SelectionPolicy::default(), 3, 3, 7);

        assert!(picks.iter().all(|&id| id == ImageId(1)));
    }

    // Tests cycling uses every image once, nearest first, then restarts
    // Verified by never evicting old picks from the cycle window
    #[test]
    fn test_cycle_order_and_restart() {
        let palette = palette_of(&[30, 0, 20, 10]);
        let policy = SelectionPolicy {
            juxtaposition: false,
            cycle: true,
        };

        let picks = run_selection(&palette, policy, 3, 2, 1);

        let expected = [1, 3, 2, 0, 1, 3].map(ImageId);
        assert_eq!(picks, expected);
    }

    // Tests no image repeats within any window of palette-size cycle picks
    // Verified by checking only aligned cycles
    #[test]
    fn test_cycle_windows_are_distinct() {
        let palette = palette_of(&[0, 40, 80, 120, 160]);
        let policy = SelectionPolicy {
            juxtaposition: false,
            cycle: true,
        };

        let picks = run_selection(&palette, policy, 5, 4, 3);

        for window in picks.windows(palette.len()) {
            let distinct: HashSet<ImageId> = window.iter().copied().collect();
            assert_eq!(distinct.len(), window.len(), "repeat in {window:?}");
        }
    }

    // Tests a new cycle cannot open with the image that closed the last one
    // Verified by clearing the used set when every image has been used
    #[test]
    fn test_cycle_boundary_has_no_repeat() {
        let palette = palette_of(&[0, 100, 200]);
        let policy = SelectionPolicy {
            juxtaposition: false,
            cycle: true,
        };
        let mut state = SelectionState::new(policy, 6, palette.len());
        let mut rng = StdRng::seed_from_u64(0);
        let targets = [0, 0, 0, 255, 255, 255];

        let picks: Vec<ImageId> = tiles(6, 1)
            .iter()
            .zip(targets)
            .map(|(tile, level)| state.select(&palette, tile, gray(level), &mut rng).unwrap())
            .collect();

        assert_eq!(picks, [0, 1, 2, 0, 1, 2].map(ImageId));
        for window in picks.windows(palette.len()) {
            let distinct: HashSet<ImageId> = window.iter().copied().collect();
            assert_eq!(distinct.len(), window.len(), "repeat in {window:?}");
        }
        assert_eq!(state.cycle_used(), &[ImageId(1), ImageId(2)]);
    }

    // Tests juxtaposition never repeats an image within the recent window
    // Verified by skipping the recent-use exclusion
    #[test]
    fn test_juxtaposition_avoids_recent() {
        let palette = palette_of(&[0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
        let policy = SelectionPolicy {
            juxtaposition: true,
            cycle: false,
        };

        for seed in 0..5 {
            let picks = run_selection(&palette, policy, 4, 6, seed);
            for (index, pick) in picks.iter().enumerate() {
                let window = &picks[index.saturating_sub(6)..index];
                assert!(!window.contains(pick), "seed {seed} repeated {pick} at {index}");
            }
        }
    }

    // Tests the image directly above is excluded even when it left the recent window
    // Verified by never updating the above slot
    #[test]
    fn test_juxtaposition_avoids_above() {
        let palette = palette_of(&[0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
        let policy = SelectionPolicy {
            juxtaposition: true,
            cycle: false,
        };
        let columns = 8;

        let picks = run_selection(&palette, policy, columns, 4, 11);

        for (index, pick) in picks.iter().enumerate().skip(columns) {
            assert_ne!(*pick, picks[index - columns]);
        }
    }

    // Tests juxtaposition with cycling over a tiny palette keeps neighbors distinct
    // Verified by letting the trimmed exclusion keep the oldest entries
    #[test]
    fn test_juxtaposed_cycle_small_palette() {
        let palette = palette_of(&[0, 100, 200]);
        let policy = SelectionPolicy {
            juxtaposition: true,
            cycle: true,
        };
        let columns = 3;

        let picks = run_selection(&palette, policy, columns, 4, 5);

        for (index, pick) in picks.iter().enumerate().skip(1) {
            assert_ne!(*pick, picks[index - 1]);
            if index >= columns {
                assert_ne!(*pick, picks[index - columns]);
            }
        }
    }

    // Tests the exclusion list orders cycle history before adjacency
    // Verified by appending cycle entries last
    #[test]
    fn test_exclusion_order() {
        let palette = palette_of(&[0, 50, 100, 150, 200, 250, 25, 75]);
        let policy = SelectionPolicy {
            juxtaposition: true,
            cycle: true,
        };
        let mut state = SelectionState::new(policy, 2, palette.len());
        let mut rng = StdRng::seed_from_u64(9);
        assert!(state.exclusion_for(0).is_empty());

        let layout = tiles(2, 2);
        let first = state.select(&palette, &layout[0], gray(0), &mut rng).unwrap();
        let second = state.select(&palette, &layout[1], gray(0), &mut rng).unwrap();

        assert_eq!(state.cycle_used(), &[first, second]);
        assert_eq!(state.recent().collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(state.above(0), Some(first));
        assert_eq!(state.above(1), Some(second));
        assert_eq!(state.exclusion_for(0), vec![second, first]);
        assert_eq!(state.policy(), policy);
    }

    // Tests a lone candidate is chosen without consulting the generator
    // Verified by drawing for every call
    #[test]
    fn test_pick_uniform() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_uniform(&[ImageId(4)], &mut rng).unwrap(), ImageId(4));
        assert!(matches!(
            pick_uniform(&[], &mut rng),
            Err(MosaicError::NoCandidates { .. })
        ));

        let candidates = [ImageId(1), ImageId(2), ImageId(3)];
        let seen: HashSet<ImageId> = (0..200)
            .map(|_| pick_uniform(&candidates, &mut rng).unwrap())
            .collect();
        assert_eq!(seen.len(), 3);
    }
}
