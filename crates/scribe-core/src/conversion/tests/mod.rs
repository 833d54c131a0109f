#[cfg(test)]
mod consumable_tests;
#[cfg(test)]
mod downcast_tests;
#[cfg(test)]
mod mapper_tests;
#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod upcast_tests;
