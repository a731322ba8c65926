pub mod auth {
    pub mod jwt;
    pub mod password;
}

pub mod cache {
    pub mod redis_store;
}

pub mod db {
    pub mod postgres;
}

pub mod integrations {
    pub mod ai_reply;
    pub mod image_host;
    pub mod mailer;
}

pub mod limiter {
    pub mod rate_limiter;
}

pub mod storage {
    pub mod resume_store;
}

pub mod utils {
    pub mod document_key;
    pub mod get_client_ip;
    pub mod markdown;
}
