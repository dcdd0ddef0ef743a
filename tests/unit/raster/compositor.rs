//! Tests for region averaging, filling, blitting and thresholding

#[cfg(test)]
mod tests {
    use photomosaic::MosaicError;
    use photomosaic::raster::compositor::{
        average_color, blit_block, fill_average, fill_color, threshold,
    };
    use photomosaic::raster::{Color, PixelBuffer};
    use photomosaic::spatial::regions::box_region;
    use photomosaic::spatial::{ByteOffsets, PixelIndices};

    fn offsets(indices: &[usize]) -> ByteOffsets {
        PixelIndices::from(indices.to_vec()).into_byte_offsets()
    }

    // Tests a uniform region averages to its own color
    // Verified by dividing by the buffer size instead of the region size
    #[test]
    fn test_uniform_average() {
        let color = Color::from_argb(200, 17, 99, 250);
        let buffer = PixelBuffer::filled(5, 5, color).unwrap();
        let region = box_region(6, 3, 5, 5).into_byte_offsets();

        assert_eq!(average_color(&buffer, Some(&region)).unwrap(), color);
        assert_eq!(average_color(&buffer, None).unwrap(), color);
    }

    // Tests the mean is truncated toward zero per channel
    // Verified by rounding to nearest
    #[test]
    fn test_average_truncates() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0, 0, 0, 255]);
        data.extend_from_slice(&[1, 3, 255, 254]);
        let buffer = PixelBuffer::new(2, 1, data).unwrap();

        let average = average_color(&buffer, None).unwrap();

        assert_eq!(average, Color::from_argb(254, 127, 1, 0));
    }

    // Tests averaging only reads the listed offsets
    // Verified by averaging the whole buffer
    #[test]
    fn test_average_of_subset() {
        let mut buffer = PixelBuffer::filled(2, 2, Color::BLACK).unwrap();
        fill_color(&mut buffer, &offsets(&[3]), Color::WHITE).unwrap();

        let average = average_color(&buffer, Some(&offsets(&[3]))).unwrap();

        assert_eq!(average, Color::WHITE);
    }

    // Tests averaging an empty region fails instead of dividing by zero
    // Verified by removing the empty check
    #[test]
    fn test_average_empty_region() {
        let buffer = PixelBuffer::filled(2, 2, Color::WHITE).unwrap();

        let result = average_color(&buffer, Some(&offsets(&[])));

        assert!(matches!(result, Err(MosaicError::EmptyRegion)));
    }

    // Tests out of range offsets are reported
    // Verified by skipping unreadable groups
    #[test]
    fn test_average_offset_out_of_bounds() {
        let buffer = PixelBuffer::filled(2, 2, Color::WHITE).unwrap();

        let result = average_color(&buffer, Some(&offsets(&[4])));

        assert!(matches!(
            result,
            Err(MosaicError::OffsetOutOfBounds {
                offset: 16,
                buffer_len: 16
            })
        ));
    }

    // Tests fill writes every channel including alpha and nothing else
    // Verified by leaving alpha untouched
    #[test]
    fn test_fill_color() {
        let mut buffer = PixelBuffer::filled(3, 1, Color::BLACK).unwrap();
        let color = Color::from_argb(10, 20, 30, 40);

        fill_color(&mut buffer, &offsets(&[0, 2]), color).unwrap();

        assert_eq!(buffer.pixel(0, 0), Some(color));
        assert_eq!(buffer.pixel(1, 0), Some(Color::BLACK));
        assert_eq!(buffer.pixel(2, 0), Some(color));
    }

    // Tests filling a region with its average twice changes nothing the second time
    // Verified by averaging the source pixels after each write
    #[test]
    fn test_fill_average_idempotent() {
        let data: Vec<u8> = (0..16_u8).flat_map(|v| [v * 3, v * 5, v * 7, 255]).collect();
        let mut buffer = PixelBuffer::new(4, 4, data).unwrap();
        let region = box_region(0, 3, 4, 4).into_byte_offsets();

        let first = fill_average(&mut buffer, &region).unwrap();
        let snapshot = buffer.clone();
        let second = fill_average(&mut buffer, &region).unwrap();

        assert_eq!(first, second);
        assert_eq!(buffer, snapshot);
        assert_eq!(buffer.pixel(3, 3), Some(Color::from_argb(255, 105, 75, 45)));
    }

    // Tests blit copies source pixels onto offsets in order
    // Verified by reversing the source iteration
    #[test]
    fn test_blit_block() {
        let mut canvas = PixelBuffer::filled(3, 3, Color::BLACK).unwrap();
        let block = PixelBuffer::new(2, 1, vec![1, 1, 1, 255, 2, 2, 2, 255]).unwrap();

        blit_block(&mut canvas, block.as_bytes(), &offsets(&[4, 8])).unwrap();

        assert_eq!(canvas.pixel(1, 1), Some(Color::from_argb(255, 1, 1, 1)));
        assert_eq!(canvas.pixel(2, 2), Some(Color::from_argb(255, 2, 2, 2)));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
    }

    // Tests blit refuses a source whose pixel count differs from the region
    // Verified by zipping to the shorter side
    #[test]
    fn test_blit_mismatch() {
        let mut canvas = PixelBuffer::filled(3, 3, Color::BLACK).unwrap();
        let untouched = canvas.clone();

        let result = blit_block(&mut canvas, &[0; 12], &offsets(&[0, 1]));

        assert!(matches!(
            result,
            Err(MosaicError::BlitMismatch {
                tile: None,
                expected: 2,
                actual: 3
            })
        ));
        assert_eq!(canvas, untouched);
    }

    // Tests the threshold maps luminance around 127 and keeps alpha
    // Verified by using <= instead of <
    #[test]
    fn test_threshold_levels() {
        let mut data = Vec::new();
        data.extend_from_slice(&[126, 127, 127, 40]);
        data.extend_from_slice(&[127, 127, 127, 90]);
        let mut buffer = PixelBuffer::new(2, 1, data).unwrap();

        threshold(&mut buffer);

        assert_eq!(buffer.pixel(0, 0), Some(Color::from_argb(40, 0, 0, 0)));
        assert_eq!(buffer.pixel(1, 0), Some(Color::from_argb(90, 255, 255, 255)));
    }

    // Tests thresholding is idempotent
    // Verified by inverting levels on each pass
    #[test]
    fn test_threshold_idempotent() {
        let data: Vec<u8> = (0..64_u8).flat_map(|v| [v * 4, 255 - v, v, 200]).collect();
        let mut buffer = PixelBuffer::new(8, 8, data).unwrap();

        threshold(&mut buffer);
        let once = buffer.clone();
        threshold(&mut buffer);

        assert_eq!(buffer, once);
    }
}
