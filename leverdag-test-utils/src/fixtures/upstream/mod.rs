use crate::TestContext;

pub mod data;
pub mod mockito;

impl TestContext {
    pub fn upstream<'a>(&'a mut self) -> UpstreamFixtures<'a> {
        UpstreamFixtures { setup: self }
    }
}

pub struct UpstreamFixtures<'a> {
    pub setup: &'a mut TestContext,
}
