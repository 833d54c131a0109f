#[cfg(test)]
mod editing_tests;
