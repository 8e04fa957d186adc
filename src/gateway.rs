pub mod ddb;
pub mod events;
pub mod factory;
pub mod log;
#[cfg(test)]
pub mod memory;
pub mod sns;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GatewayPublisherVia {
    Sns,
    LocalDynamoDB,
    Log,
}
