mod metadata_tests;
mod detect_tests;
