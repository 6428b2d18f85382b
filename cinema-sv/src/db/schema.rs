table! {
    actors (id) {
        id -> Int4,
        first_name -> Text,
        last_name -> Text,
    }
}

table! {
    cinema_halls (id) {
        id -> Int4,
        name -> Text,
        rows -> Int4,
        seats_in_row -> Int4,
    }
}

table! {
    genres (id) {
        id -> Int4,
        name -> Text,
    }
}

table! {
    movie_actors (movie_id, actor_id) {
        movie_id -> Int4,
        actor_id -> Int4,
    }
}

table! {
    movie_genres (movie_id, genre_id) {
        movie_id -> Int4,
        genre_id -> Int4,
    }
}

table! {
    movie_sessions (id) {
        id -> Int4,
        show_time -> Timestamptz,
        movie_id -> Int4,
        cinema_hall_id -> Int4,
    }
}

table! {
    movies (id) {
        id -> Int4,
        title -> Text,
        description -> Text,
        duration -> Int4,
    }
}

table! {
    orders (id) {
        id -> Int4,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

table! {
    tickets (id) {
        id -> Int4,
        row -> Int4,
        seat -> Int4,
        movie_session_id -> Int4,
        order_id -> Int4,
    }
}

table! {
    users (id) {
        id -> Int4,
        username -> Text,
        token -> Uuid,
        created_at -> Timestamptz,
    }
}

joinable!(movie_actors -> actors (actor_id));
joinable!(movie_actors -> movies (movie_id));
joinable!(movie_genres -> genres (genre_id));
joinable!(movie_genres -> movies (movie_id));
joinable!(movie_sessions -> cinema_halls (cinema_hall_id));
joinable!(movie_sessions -> movies (movie_id));
joinable!(orders -> users (user_id));
joinable!(tickets -> movie_sessions (movie_session_id));
joinable!(tickets -> orders (order_id));

allow_tables_to_appear_in_same_query!(
    actors,
    cinema_halls,
    genres,
    movie_actors,
    movie_genres,
    movie_sessions,
    movies,
    orders,
    tickets,
    users,
);
