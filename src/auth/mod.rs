mod token;

pub(crate) use token::{exchange_token, TokenCache};
