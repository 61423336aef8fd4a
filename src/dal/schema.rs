table! {
    pull_request_reviewers (pull_request_id, user_id) {
        pull_request_id -> Text,
        user_id -> Text,
    }
}

table! {
    pull_requests (pull_request_id) {
        pull_request_id -> Text,
        pull_request_name -> Text,
        author_id -> Text,
        status -> Text,
        created_at -> Timestamptz,
        merged_at -> Nullable<Timestamptz>,
    }
}

table! {
    teams (team_name) {
        team_name -> Text,
    }
}

table! {
    users (user_id) {
        user_id -> Text,
        username -> Text,
        team_name -> Nullable<Text>,
        is_active -> Bool,
    }
}

joinable!(pull_request_reviewers -> pull_requests (pull_request_id));
joinable!(pull_request_reviewers -> users (user_id));
joinable!(pull_requests -> users (author_id));
joinable!(users -> teams (team_name));

allow_tables_to_appear_in_same_query!(
    pull_request_reviewers,
    pull_requests,
    teams,
    users,
);
