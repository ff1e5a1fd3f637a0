//! GraphQL query templates
//!
//! Written for reading; [`super::compact`] folds them into one line before
//! they are sent.

pub(super) const BOARD_FIELDS: &str = "
    id
    name
    description
    state
    updated_at
    workspace {
        id
        name
    }
    owner {
        id
        name
        email
    }
";

pub(super) const BOARDS_PAGE: &str = "
query ($limit: Int, $page: Int) {
    boards(limit: $limit, page: $page, order_by: created_at) {
        {fields}
    }
}
";

pub(super) const BOARDS_BY_ID: &str = "
query ($ids: [ID!], $limit: Int) {
    boards(ids: $ids, limit: $limit) {
        {fields}
    }
}
";

pub(super) const GROUPS: &str = "
query ($ids: [ID!]) {
    boards(ids: $ids) {
        id
        groups {
            id
            title
            position
            color
            archived
            deleted
        }
    }
}
";

pub(super) const ITEMS: &str = "
query ($ids: [ID!], $limit: Int, $page: Int) {
    boards(ids: $ids) {
        id
        items(limit: $limit, page: $page, newest_first: false) {
            id
            name
            state
            created_at
            updated_at
            creator_id
            creator {
                email
                name
            }
            parent_item {
                id
            }
            board {
                id
                name
            }
            group {
                id
                title
            }
        }
    }
}
";

pub(super) const COLUMNS: &str = "
query ($ids: [ID!]) {
    boards(ids: $ids) {
        id
        columns {
            id
            title
            archived
            settings_str
            description
            type
            width
        }
    }
}
";

pub(super) const COLUMN_VALUES: &str = "
query ($ids: [ID!]) {
    items(ids: $ids) {
        id
        column_values {
            id
            title
            type
            text
            value
            additional_info
        }
    }
}
";

pub(super) const ME: &str = "
query {
    me {
        id
        name
        email
        account {
            id
            name
        }
    }
}
";
