//! Print the GraphQL schema.

/// Write the catalog SDL to stdout.
pub fn print() {
    #[allow(clippy::print_stdout)]
    {
        println!("{}", catalog_server::graphql::schema_sdl());
    }
}
