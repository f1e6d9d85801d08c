mod helpers;

mod api {
    mod chat_client;
    mod retrieval_client;
}

mod error {
    mod api_client;
}

mod session {
    mod controller;
}
