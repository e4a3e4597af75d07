// Diesel table definition for stored clashes.

diesel::table! {
    clashes (name) {
        name -> Text,
        record -> Text,
    }
}
