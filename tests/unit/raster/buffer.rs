//! Tests for BGRA pixel buffers and channel ordering

#[cfg(test)]
mod tests {
    use photomosaic::MosaicError;
    use photomosaic::raster::buffer::{ALPHA, BLUE, GREEN, RED};
    use photomosaic::raster::{Color, PixelBuffer};

    // Tests channel offsets follow B, G, R, A
    // Verified by swapping red and blue offsets
    #[test]
    fn test_channel_order() {
        let color = Color::from_argb(4, 3, 2, 1);
        let bgra = color.to_bgra();

        assert_eq!(bgra[BLUE], 1);
        assert_eq!(bgra[GREEN], 2);
        assert_eq!(bgra[RED], 3);
        assert_eq!(bgra[ALPHA], 4);
        assert_eq!(Color::from_bgra(bgra), color);
    }

    // Tests buffers reject a byte length that does not match the dimensions
    // Verified by removing the length check
    #[test]
    fn test_new_rejects_wrong_length() {
        let result = PixelBuffer::new(2, 2, vec![0; 15]);

        assert!(matches!(
            result,
            Err(MosaicError::BufferShape {
                expected: 16,
                actual: 15
            })
        ));
    }

    // Tests zero-area buffers are rejected
    // Verified by allowing zero width
    #[test]
    fn test_new_rejects_zero_area() {
        assert!(PixelBuffer::new(0, 3, Vec::new()).is_err());
        assert!(PixelBuffer::filled(3, 0, Color::WHITE).is_err());
    }

    // Tests filled buffers repeat the color in BGRA order
    // Verified by writing channels in ARGB order
    #[test]
    fn test_filled_layout() {
        let color = Color::from_argb(255, 10, 20, 30);
        let buffer = PixelBuffer::filled(3, 2, color).unwrap();

        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert_eq!(&buffer.as_bytes()[..4], &[30, 20, 10, 255]);
        assert_eq!(buffer.pixel(2, 1), Some(color));
    }

    // Tests pixel lookup is row-major and bounds-checked
    // Verified by transposing x and y in the offset calculation
    #[test]
    fn test_pixel_lookup() {
        let mut data = vec![0; 3 * 2 * 4];
        // Pixel (x = 2, y = 1) starts at byte (1 * 3 + 2) * 4
        data[20..24].copy_from_slice(&[1, 2, 3, 4]);
        let buffer = PixelBuffer::new(3, 2, data).unwrap();

        assert_eq!(buffer.pixel(2, 1), Some(Color::from_argb(4, 3, 2, 1)));
        assert_eq!(buffer.pixel(3, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
    }

    // Tests cropping keeps the top-left corner row by row
    // Verified by cropping from the bottom-right
    #[test]
    fn test_crop_top_left() {
        let data: Vec<u8> = (0..4 * 4)
            .flat_map(|index| [index as u8, 0, 0, 255])
            .collect();
        let buffer = PixelBuffer::new(4, 4, data).unwrap();

        let cropped = buffer.crop_top_left(2, 3).unwrap();

        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 3);
        let blues: Vec<u8> = cropped.as_bytes().chunks(4).map(|px| px[0]).collect();
        assert_eq!(blues, vec![0, 1, 4, 5, 8, 9]);
    }

    // Tests cropping beyond the buffer is an error
    // Verified by clamping instead of rejecting
    #[test]
    fn test_crop_too_large() {
        let buffer = PixelBuffer::filled(2, 2, Color::BLACK).unwrap();

        assert!(buffer.crop_top_left(3, 1).is_err());
        assert_eq!(buffer.crop_top_left(2, 2).unwrap(), buffer);
    }

    // Tests the byte vector survives a round trip through the buffer
    // Verified by cloning instead of moving the data
    #[test]
    fn test_into_bytes() {
        let data = vec![9; 8];
        let buffer = PixelBuffer::new(2, 1, data.clone()).unwrap();

        assert_eq!(buffer.into_bytes(), data);
    }
}
