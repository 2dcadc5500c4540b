//! The GraphQL documents the backend understands. One constant per
//! operation; variables are always passed separately, never interpolated.

pub const BOOK_INSTANCES: &str = "
query bookInstances($lat: Float, $lng: Float, $term: String, $offerings: [String]) {
  bookInstances(lat: $lat, lng: $lng, term: $term, offerings: $offerings) {
    id
    medium
    reader {
      id
      name
      photos
    }
    book {
      id
      title
      tags
      authors {
        id
        name
        bio
      }
      smallCoverUrl
      mediumCoverUrl
    }
    location
  }
}
";

pub const POST_BOOK: &str = "
mutation PostBook($lat: Float!, $lng: Float!, $bookId: ID!, $medium: Medium!, $offerings: [Offering]) {
  postBook(bookId: $bookId, lat: $lat, lng: $lng, medium: $medium, offerings: $offerings) {
    id
    medium
    reader {
      id
      name
    }
    book {
      id
      title
      isbn
      authors {
        id
        name
        bio
      }
    }
    location
  }
}
";

pub const ME: &str = "
query Me {
  me {
    id
    name
    email
    photos
  }
}
";

pub const MY_FEED: &str = "
query MyFeed {
  me {
    id
    feed(first: 100) {
      edges {
        node {
          id
          title
          ref
          type
          thumbnail
          insertedAt
          user {
            id
            name
            username
          }
          creators(first: 3) {
            edges {
              node {
                id
                name
              }
            }
          }
        }
      }
    }
  }
}
";

pub const MY_ACTIVITY: &str = "
query MyActivity {
  me {
    inquiries(first: 10) {
      edges {
        node {
          id
          offering
          user {
            id
            name
          }
          bookInstance {
            reader {
              id
              name
            }
            book {
              id
              title
              mediumCoverUrl
            }
          }
        }
      }
    }

    requests(first: 10) {
      edges {
        node {
          id
          offering
          user {
            id
            name
          }
          bookInstance {
            reader {
              id
              name
            }
            book {
              id
              title
              mediumCoverUrl
            }
          }
        }
      }
    }

    interests(first: 10) {
      edges {
        node {
          id
          title
          type
          ref
          creators(first: 3) {
            edges {
              node {
                id
                name
              }
            }
          }
        }
      }
    }
  }
}
";

pub const READER: &str = "
query Reader($id: ID!) {
  reader(id: $id) {
    id
    name
    username
    amIFollowing
    interests(first: 20) {
      edges {
        node {
          id
          title
          type
          ref
          thumbnail
          insertedAt
          location
          creators(first: 3) {
            edges {
              node {
                id
                name
              }
            }
          }
        }
      }
    }
  }
}
";

pub const UPDATE_PROFILE: &str = "
mutation UpdateProfile($photo: Upload) {
  updateProfile(photo: $photo) {
    id
    name
    email
    photos
  }
}
";
