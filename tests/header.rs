// The generated C header lands in the build output, not the source tree

#![cfg(feature = "soundtouch")]

use std::path::Path;

#[test]
fn test_header_generated_into_out_dir() {
    let header = Path::new(env!("OUT_DIR")).join("pitchshift.h");
    let text = std::fs::read_to_string(&header).expect("header written by build.rs");
    assert!(text.contains("PITCHSHIFT_H"));
    assert!(text.contains("pitch_shifter_process"));
    assert!(text.contains("pitch_shifter_pitch_control"));
}
