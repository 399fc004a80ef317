use serde::Serialize;
use serde_json::Value;

use crate::domain::model::{FieldValue, HydratedEntity, Template};
use crate::domain::ports::Hydratable;
use crate::utils::error::Result;

/// Movie details as returned by an OMDb-style API. Every text field stays a
/// string because the API reports missing data as `"N/A"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster: String,
    pub ratings: Vec<Value>,
    pub metascore: String,
    pub imdb_rating: String,
    pub imdb_votes: String,
    pub imdb_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dvd: String,
    pub box_office: String,
    pub production: String,
    pub website: String,
    pub response: String,
}

const TEXT_FIELDS: [&str; 24] = [
    "title",
    "year",
    "rated",
    "released",
    "runtime",
    "genre",
    "director",
    "writer",
    "actors",
    "plot",
    "language",
    "country",
    "awards",
    "poster",
    "metascore",
    "imdbRating",
    "imdbVotes",
    "imdbId",
    "type",
    "dvd",
    "boxOffice",
    "production",
    "website",
    "response",
];

impl Hydratable for Movie {
    fn template() -> Template {
        let mut template = Template::new();
        for field in TEXT_FIELDS {
            template.insert(field, "");
        }
        template.insert("ratings", FieldValue::Array(Vec::new()));
        template
    }

    fn from_entity(mut entity: HydratedEntity) -> Result<Self> {
        Ok(Movie {
            title: entity.take_string("title")?,
            year: entity.take_string("year")?,
            rated: entity.take_string("rated")?,
            released: entity.take_string("released")?,
            runtime: entity.take_string("runtime")?,
            genre: entity.take_string("genre")?,
            director: entity.take_string("director")?,
            writer: entity.take_string("writer")?,
            actors: entity.take_string("actors")?,
            plot: entity.take_string("plot")?,
            language: entity.take_string("language")?,
            country: entity.take_string("country")?,
            awards: entity.take_string("awards")?,
            poster: entity.take_string("poster")?,
            ratings: entity.take_array("ratings")?,
            metascore: entity.take_string("metascore")?,
            imdb_rating: entity.take_string("imdbRating")?,
            imdb_votes: entity.take_string("imdbVotes")?,
            imdb_id: entity.take_string("imdbId")?,
            kind: entity.take_string("type")?,
            dvd: entity.take_string("dvd")?,
            box_office: entity.take_string("boxOffice")?,
            production: entity.take_string("production")?,
            website: entity.take_string("website")?,
            response: entity.take_string("response")?,
        })
    }
}
