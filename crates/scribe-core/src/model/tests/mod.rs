#[cfg(test)]
mod writer_tests;
