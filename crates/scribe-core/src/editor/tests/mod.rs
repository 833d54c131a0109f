#[cfg(test)]
mod editor_tests;
#[cfg(test)]
mod locale_tests;
