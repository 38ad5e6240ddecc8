//! Frequency-bin to pitch-class mapping
//!
//! Each FFT bin is assigned to the semitone class nearest its center
//! frequency on the equal-tempered scale anchored at the tuning
//! reference. The DC bin carries no pitch and is excluded.

/// Map every spectrogram bin to a pitch class in 0..12
///
/// Class 0 is C, class 9 is A (the tuning reference when
/// `tuning_frequency` is 440 Hz). Returns `None` for the DC bin.
///
/// # Arguments
///
/// * `n_bins` - Number of spectrogram bins (frame_size / 2 + 1)
/// * `frame_size` - Analysis frame size in samples
/// * `sample_rate` - Sample rate in Hz
/// * `tuning_frequency` - Reference frequency for A4 (typically 440.0)
pub fn pitch_class_map(
    n_bins: usize,
    frame_size: usize,
    sample_rate: u32,
    tuning_frequency: f32,
) -> Vec<Option<usize>> {
    (0..n_bins)
        .map(|bin| {
            if bin == 0 {
                return None;
            }
            let frequency = bin as f32 * sample_rate as f32 / frame_size as f32;
            Some(pitch_class(frequency, tuning_frequency))
        })
        .collect()
}

/// Pitch class (0 = C .. 11 = B) of a frequency in Hz
fn pitch_class(frequency: f32, tuning_frequency: f32) -> usize {
    // MIDI note 69 is A4; round to the nearest semitone, fold mod 12
    let midi = 69.0 + 12.0 * (frequency / tuning_frequency).log2();
    let note = midi.round() as i64;
    note.rem_euclid(12) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitches() {
        assert_eq!(pitch_class(440.0, 440.0), 9); // A4
        assert_eq!(pitch_class(220.0, 440.0), 9); // A3, octave equivalent
        assert_eq!(pitch_class(880.0, 440.0), 9); // A5
        assert_eq!(pitch_class(261.63, 440.0), 0); // C4
        assert_eq!(pitch_class(311.13, 440.0), 3); // D#4
    }

    #[test]
    fn test_detuned_reference_shifts_classes() {
        // With A4 at 466.16 Hz (one semitone sharp), 440 Hz reads as G#
        assert_eq!(pitch_class(440.0, 466.16), 8);
    }

    #[test]
    fn test_map_excludes_dc_and_covers_bins() {
        let map = pitch_class_map(1025, 2048, 44100, 440.0);
        assert_eq!(map.len(), 1025);
        assert!(map[0].is_none(), "DC bin carries no pitch class");
        for class in map.iter().skip(1) {
            let class = class.expect("non-DC bins are all mapped");
            assert!(class < 12);
        }
    }

    #[test]
    fn test_a440_bin_maps_to_class_a() {
        // Bin nearest 440 Hz at 44.1 kHz / 2048: bin 20 = 430.7 Hz
        let map = pitch_class_map(1025, 2048, 44100, 440.0);
        assert_eq!(map[20], Some(9));
    }
}
