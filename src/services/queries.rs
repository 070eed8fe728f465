//! Programmatic composition of the GraphQL queries sent to the GitHub
//! API. The organization-inclusive contributions query carries one
//! aliased `contributionsCollection` section per organization, so the
//! query text and the aliases used to read the response back are always
//! produced by the same builder.

/// Query for a user's organization memberships.
pub const ORGANIZATIONS_QUERY: &str = "\
query($username: String!) {
  user(login: $username) {
    organizations(first: 100) {
      nodes {
        id
        login
      }
    }
  }
}";

const CALENDAR_FIELDS: &str = "\
contributionCalendar {
  totalContributions
  weeks {
    contributionDays {
      contributionCount
      date
    }
  }
}";

const REPOSITORY_FIELDS: &str = "\
repositories(first: 100, ownerAffiliations: [OWNER, ORGANIZATION_MEMBER, COLLABORATOR], orderBy: {field: UPDATED_AT, direction: DESC}) {
  nodes {
    stargazerCount
    forkCount
    languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
      edges {
        size
        node {
          name
          color
        }
      }
    }
  }
}";

/// Builds the combined contributions-and-repositories query. With zero
/// organizations this degenerates into the user-only query used by the
/// fallback path.
#[derive(Debug, Default)]
pub struct ContributionsQueryBuilder {
    organization_ids: Vec<String>,
}

impl ContributionsQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organizations<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            organization_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add_organization(&mut self, id: impl Into<String>) {
        self.organization_ids.push(id.into());
    }

    /// Alias names of the organization sections, in the order their
    /// sub-queries appear in the built query.
    pub fn aliases(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.organization_ids.len()).map(|index| format!("org{}", index))
    }

    pub fn build(&self) -> String {
        let org_sections: String = self
            .organization_ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                format!(
                    "org{}: contributionsCollection(organizationID: \"{}\") {{\n{}\n}}\n",
                    index, id, CALENDAR_FIELDS
                )
            })
            .collect();

        format!(
            "query($username: String!) {{\n\
             user(login: $username) {{\n\
             contributionsCollection {{\n{}\n}}\n\
             {}{}\n\
             }}\n\
             }}",
            CALENDAR_FIELDS, org_sections, REPOSITORY_FIELDS
        )
    }
}
