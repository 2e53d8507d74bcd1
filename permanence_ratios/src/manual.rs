/*!

This is the long-form manual for `permanence_ratios` and `ridingproj`.

## The method

Polls are published for large regions, while seats are won in ridings. The permanence of ratios
method assumes that every riding keeps the same relationship to its region (or to the whole
country) as in the base election. For a party with share `x`, the odds are `x / (100 - x)`.
Between the base election and the poll, the odds of the party in the region moved by the ratio

```text
ratio = odds(poll) / odds(baseline)
```

and the odds of the party in each riding of that region are multiplied by the same ratio:

```text
odds(projected) = odds(riding) * ratio
projected = 100 / (1 + 1 / odds(projected))
```

Every party is updated on its own. The projected shares of a riding are not normalized and do not
sum to 100 in general. A party that did not run in a riding in the base election stays at zero.

The winner of a riding is the party with the largest projected share. Equal shares go to the party
listed first in the order Conservative, Liberal, NDP, Green, Bloc.

## The two passes

`ridingproj` runs the projection twice over the same ridings:

* `national`: one baseline (the national results of the base election) and one national poll,
  applied to all the ridings.
* `regional`: each riding uses the historical results of its region as the baseline and the poll
  of its region.

Comparing both tallies shows how sensitive the method is to the granularity of the baseline.

## Input format

The input is the table of results by candidate published by Elections Canada
(`table_tableau12.csv` for the 2015 general election). The columns used are:

```text
Province
Electoral District Name/Nom de circonscription
Electoral District Number/Numéro de circonscription
Candidate/Candidat
Votes Obtained/Votes obtenus
Percentage of Votes Obtained /Pourcentage des votes obtenus
```

The party of a candidate is found in the candidate column: the first of `Conservative`, `Liberal`,
`New Democratic`, `Green`, `Bloc Québécois` that appears in it. All the other candidates count as
"Other": their votes count in the regional totals, but not in any share vector.

The provinces are grouped into the regions of the polls:

| Region      | Provinces                                                      |
|-------------|----------------------------------------------------------------|
| BC          | British Columbia                                               |
| Alberta     | Alberta                                                        |
| Prairies    | Manitoba, Saskatchewan                                         |
| Ontario     | Ontario                                                        |
| Quebec      | Quebec                                                         |
| Atlantic    | Newfoundland and Labrador, Prince Edward Island, Nova Scotia, New Brunswick |
| Territories | Yukon, Northwest Territories, Nunavut                          |

## Configuration

Without a configuration file, `ridingproj` projects the 2019 election from the 2015 results with the
polls of October 21, 2019. Another set of polls can be given in JSON:

```text
{
  "outputSettings": { "contestName": "2019 federal election", "pollDate": "2019-10-21" },
  "nationalBaseline": [31.9, 39.5, 19.7, 3.5, 4.7],
  "nationalPoll": [31.6, 32.0, 18.4, 7.5, 7.0],
  "regionalPolls": {
    "Quebec": [14.2, 33.2, 13.5, 6.0, 30.2]
  }
}
```

The shares are always listed in the party order above. A region without a poll keeps its
historical results, which means no swing in that region.

## Failures

The formula has no value when a party is present in a riding but absent from the poll, or when the
baseline share of a party is 100. A party absent from the baseline but present in a riding gets
100. The whole pass stops on the first riding without a value, and the riding and the party are
reported.

 */
