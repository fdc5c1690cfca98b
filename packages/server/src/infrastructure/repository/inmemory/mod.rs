mod hub;

pub use hub::InMemoryChatHubRepository;
